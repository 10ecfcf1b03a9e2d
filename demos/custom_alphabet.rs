use fmindex::Alphabet;

const INVALID: u8 = 255;

fn main() {
    // This example shows how to build a custom alphabet. Dense code 0 is
    // always the sentinel, so a searchable alphabet of N symbols needs
    // N + 1 dense codes.

    let mut digits_table = [INVALID; 256];
    for (code, digit) in (b'0'..=b'9').enumerate() {
        digits_table[digit as usize] = code as u8 + 1;
    }
    let digits = Alphabet::new(digits_table, 11, 0);
    assert_eq!(digits.num_dense_symbols(), 11);
    assert_eq!(digits.num_searchable_dense_symbols(), 10);

    // Case-insensitive, ambiguous-symbol alphabets (like DNA-with-N) map
    // several IO bytes onto the same dense code.
    let roman = fmindex::alphabet::ascii_protein();
    assert_eq!(roman.num_searchable_dense_symbols(), 20);
}
