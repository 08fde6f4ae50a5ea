use codspeed_criterion_compat::{
    Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use ndf_tokenizer::{SyntaxKind, Tokenizer};

static DESCRIPTOR: &str = "
export Descriptor_Unit_Tank is TEntityDescriptor
(
    DescriptorId = GUID:{6f5c7a1e-1b2c-4d3e-8f9a-0b1c2d3e4f5a}
    ClassNameForDebug = 'Unit_Tank' // debug only
    ModulesDescriptors = [
        ~/TargetManagerModuleSelector,
        FacingInfos is ~/FacingInfosModuleDescriptor,
        TTagsModuleDescriptor(TagSet = ['Tank', 'Armored']),
        ApparenceModel is VehicleApparenceModuleDescriptor
        (
            Depiction = $/GFX/Depiction_Tank
            Color = RGBA[120, 80, 40, 255]
            Flags = EFlag/Visible | EFlag/Selectable
        ),
    ]
)
";

static NUMBERS: &str = "
Ranges is [0.5, 1200, -30, 4.25, 18, 1e3, 77, 0.125, 9000, -1.5, 3, 64, 100.0, 2, 8]
Costs is MAP [ (ERessource/Command, 120), (ERessource/Fuel, 35), (ERessource/Supply, 80) ]
Ratio is 3 * 4 + 12 / 6 - 1
";

static CANDIDATES: [(&str, &str); 2] = [("descriptor", DESCRIPTOR), ("numbers", NUMBERS)];

fn iterate(s: &str) {
    let mut tokenizer = Tokenizer::new(s);

    loop {
        let next_token = tokenizer.next_token();

        if next_token.kind == SyntaxKind::EOF {
            break;
        }

        black_box(next_token);
    }
}

fn bench_iterate(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterate");

    for (name, source) in CANDIDATES {
        let source = source.repeat(32);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(name, &source, |b, s| b.iter(|| iterate(s)));
    }
}

criterion_group!(benches, bench_iterate);
criterion_main!(benches);
