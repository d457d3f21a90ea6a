use criterion::{
    black_box, criterion_group, criterion_main, Criterion, Throughput,
};

use censive::{Reader, ReaderBuilder, Row, Writer, WriterBuilder};

/// Quote-free rows, all of which take the line splitter.
fn plain(rows: usize) -> String {
    let mut data = String::new();
    for i in 0..rows {
        data.push_str(&format!(
            "{},Player {},team-{},{}.{},2017-09-{:02}\n",
            i,
            i,
            i % 32,
            i % 97,
            i % 10,
            i % 28 + 1
        ));
    }
    data
}

/// Rows where every other cell is quoted and some cells hold separators,
/// quotes and line breaks, so the tokenizer does nearly all the work.
fn quoted(rows: usize) -> String {
    let mut data = String::new();
    for i in 0..rows {
        data.push_str(&format!(
            "{},\"Smith, {}\",\"said \"\"hi\"\" {}\",\"line\nbreak\",x\r\n",
            i, i, i
        ));
    }
    data
}

fn count_rows(rdr: &mut Reader) -> u64 {
    let mut count = 0;
    let mut row = Row::new();
    while rdr.read_row(&mut row).unwrap() {
        count += 1;
    }
    count
}

macro_rules! bench_read {
    ($group:expr, $name:expr, $data:expr, $fast:expr, $expected:expr) => {{
        let data = $data;
        let group = &mut $group;
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_function($name, |b| {
            b.iter(|| {
                let mut rdr = ReaderBuilder::new()
                    .fast_path($fast)
                    .from_string(data.as_str())
                    .unwrap();
                assert_eq!(count_rows(&mut rdr), $expected);
            })
        });
    }};
}

fn read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    bench_read!(group, "plain_fast", plain(10_000), true, 10_000);
    bench_read!(group, "plain_tokenizer", plain(10_000), false, 10_000);
    bench_read!(group, "quoted", quoted(10_000), true, 10_000);
    group.finish();
}

fn parse_all(c: &mut Criterion) {
    let data = plain(10_000);
    c.bench_function("parse_all_plain", |b| {
        b.iter(|| {
            let mut rdr = Reader::from_string(data.as_str());
            black_box(rdr.parse_all().unwrap().stats().cells)
        })
    });
}

fn write(c: &mut Criterion) {
    let rows = Reader::from_string(quoted(10_000))
        .parse_all()
        .unwrap()
        .clone();
    let mut group = c.benchmark_group("write");
    group.bench_function("compact", |b| {
        b.iter(|| {
            let mut wtr = Writer::from_writer(Vec::with_capacity(1 << 20));
            wtr.write_document(&rows).unwrap();
            black_box(wtr.into_inner().len())
        })
    });
    group.bench_function("excel", |b| {
        b.iter(|| {
            let mut wtr = WriterBuilder::new()
                .excel(true)
                .from_writer(Vec::with_capacity(1 << 20))
                .unwrap();
            wtr.write_document(&rows).unwrap();
            black_box(wtr.into_inner().len())
        })
    });
    group.finish();
}

criterion_group!(benches, read, parse_all, write);
criterion_main!(benches);
