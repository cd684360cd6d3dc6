#![no_main]

use huffpack::{Alphabet, CodecConfig, HuffmanCodec};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&width, message)) = data.split_first() else {
        return;
    };
    let width = width % 8 + 1;
    let symbols: Vec<u8> = message.iter().map(|b| b >> (8 - width)).collect();

    let alphabet = Alphabet::new(0..=u8::MAX >> (8 - width)).unwrap();
    let config = CodecConfig::default()
        .with_alphabet(alphabet)
        .with_symbol_width(width);
    let codec = HuffmanCodec::new(config).unwrap();

    let compressed = codec.compress(&symbols).unwrap();
    assert_eq!(symbols, codec.decompress(&compressed).unwrap());
});
