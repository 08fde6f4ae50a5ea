use std::hint::black_box;

use codspeed_criterion_compat::{Criterion, Throughput, criterion_group, criterion_main};
use ndf_model::Value;
use ndf_path::Path;
use ndf_writer::{DirtySet, WriterOptions};

static UNIT: &str = "
export Descriptor_Unit_Tank is TEntityDescriptor
(
    ClassNameForDebug = 'Unit_Tank'
    Speed = 40 // km/h
    ModulesDescriptors = [
        ~/TargetManagerModuleSelector,
        TTagsModuleDescriptor(TagSet = ['Tank', 'Armored']),
    ]
)
";

fn bench_write(c: &mut Criterion) {
    let text = UNIT.repeat(64);
    let (tokens, parse) = ndf_parse::parse_text(&text);
    let options = WriterOptions::default();
    let speed = Path::parse("Speed").unwrap_or_default();

    let mut edited = parse.file.clone();
    let mut dirty = DirtySet::default();
    for (index, decl) in edited.declarations.iter_mut().enumerate().step_by(4) {
        if ndf_path::set(decl.value_mut(), &speed, Value::integer(60)).is_ok() {
            dirty.insert(index);
        }
    }

    let mut group = c.benchmark_group("write");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("replay", |b| {
        b.iter(|| black_box(ndf_writer::write(&parse.file, &tokens, &DirtySet::default(), &options)));
    });
    group.bench_function("edited", |b| {
        b.iter(|| black_box(ndf_writer::write(&edited, &tokens, &dirty, &options)));
    });
    group.finish();
}

criterion_group!(benches, bench_write);
criterion_main!(benches);
