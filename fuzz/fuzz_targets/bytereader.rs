#![no_main]

use bytestream::{read_integer_bits, read_len, ByteReader, Decimal, IntegerKind, Primitive};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Input bytes pick a bounded sequence of reads.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        match op {
            0 => {
                let _ = bool::read_fixed(&mut reader);
            }
            1 => {
                let _ = char::read_fixed(&mut reader);
            }
            2 => {
                let _ = Decimal::read_fixed(&mut reader);
            }
            3 => {
                let _ = read_len(&mut reader);
            }
            4 => {
                let _ = read_integer_bits(IntegerKind::I8, &mut reader);
            }
            5 => {
                let _ = f64::read_fixed(&mut reader);
            }
            _ => {
                let len = usize::from(data[idx.saturating_sub(1)] % 32);
                let _ = reader.read_bytes(len);
            }
        }
    }
});
