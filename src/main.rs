use diffsel_rs::constants::NUCLEOTIDES;
use diffsel_rs::{counts, diffsel};

fn main() {
    let sel = counts::read_counts("tests/data/sel_counts.csv").unwrap();
    let mock = counts::read_counts("tests/data/mock_counts.csv").unwrap();
    let mutdiffsel =
        diffsel::compute_mut_diffsel(&sel, &mock, &NUCLEOTIDES, 10.0, false, None, 0).unwrap();
    let sitediffsel = diffsel::mut_to_site_diffsel(&mutdiffsel).unwrap();
    println!("{:?}", mutdiffsel);
    println!("{:?}", sitediffsel);
}
