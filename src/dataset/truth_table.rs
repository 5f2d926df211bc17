use crate::dataset::Dataset;

/// The 3-bit full adder: inputs `[a, b, carry_in]`, outputs `[sum, carry_out]`.
pub fn full_adder() -> Dataset {
    let mut inputs = Vec::with_capacity(8);
    let mut labels = Vec::with_capacity(8);
    for row in 0..8u8 {
        let bits = [(row >> 2) & 1, (row >> 1) & 1, row & 1];
        let total = bits.iter().sum::<u8>();
        inputs.push(bits.iter().map(|&b| b as f64).collect());
        labels.push(vec![(total & 1) as f64, (total >> 1) as f64]);
    }
    (inputs, labels)
}
