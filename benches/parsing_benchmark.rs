use criterion::{black_box, criterion_group, criterion_main, Criterion};
use linky_tic::decoder::{DecoderOptions, StreamDecoder};
use linky_tic::tic::{parse_group, TicMode};

const HISTORIC_FRAME: &[&[u8]] = &[
    b"ADCO 012345678901 E\r\n",
    b"OPTARIF BASE 0\r\n",
    b"ISOUSC 30 9\r\n",
    b"BASE 002809718 .\r\n",
    b"PTEC TH.. $\r\n",
    b"IINST 002 Y\r\n",
    b"IMAX 090 H\r\n",
    b"PAPP 00390 -\r\n",
    b"HHPHC A ,\r\n",
    b"MOTDETAT 000000 B\r\x03\x02\n",
];

fn benchmark_parse_group(c: &mut Criterion) {
    c.bench_function("parse_group_historic", |b| {
        b.iter(|| {
            let result = parse_group(black_box(b"PAPP 00390 -\r\n"), TicMode::Historic);
            let _ = black_box(result);
        })
    });

    c.bench_function("parse_group_standard_timestamp", |b| {
        b.iter(|| {
            let result = parse_group(
                black_box(b"SMAXSN\tH081225064300\t01200\t/\r\n"),
                TicMode::Standard,
            );
            let _ = black_box(result);
        })
    });
}

fn benchmark_stream_decoder(c: &mut Criterion) {
    let decoder = StreamDecoder::new(DecoderOptions::new(TicMode::Historic));
    decoder.reset();
    decoder.process_line(b"\r\n");

    c.bench_function("process_historic_frame", |b| {
        b.iter(|| {
            for line in HISTORIC_FRAME {
                black_box(decoder.process_line(black_box(line)));
            }
        })
    });
}

criterion_group!(benches, benchmark_parse_group, benchmark_stream_decoder);
criterion_main!(benches);
