//! Fixed character alphabets and the codon translation table.

use phf::phf_map;

/// The four DNA nucleotides
pub const NUCLEOTIDES: [&str; 4] = ["A", "C", "G", "T"];

/// The 20 amino acids, one-letter codes
pub const AMINO_ACIDS: [&str; 20] = [
    "A", "C", "D", "E", "F", "G", "H", "I", "K", "L", "M", "N", "P", "Q", "R", "S", "T", "V", "W",
    "Y",
];

/// The 20 amino acids plus the stop symbol `*`
pub const AMINO_ACIDS_WITHSTOP: [&str; 21] = [
    "A", "C", "D", "E", "F", "G", "H", "I", "K", "L", "M", "N", "P", "Q", "R", "S", "T", "V", "W",
    "Y", "*",
];

/// All 64 DNA codons in alphabetical order
pub const CODONS: [&str; 64] = [
    "AAA", "AAC", "AAG", "AAT", "ACA", "ACC", "ACG", "ACT", "AGA", "AGC", "AGG", "AGT", "ATA",
    "ATC", "ATG", "ATT", "CAA", "CAC", "CAG", "CAT", "CCA", "CCC", "CCG", "CCT", "CGA", "CGC",
    "CGG", "CGT", "CTA", "CTC", "CTG", "CTT", "GAA", "GAC", "GAG", "GAT", "GCA", "GCC", "GCG",
    "GCT", "GGA", "GGC", "GGG", "GGT", "GTA", "GTC", "GTG", "GTT", "TAA", "TAC", "TAG", "TAT",
    "TCA", "TCC", "TCG", "TCT", "TGA", "TGC", "TGG", "TGT", "TTA", "TTC", "TTG", "TTT",
];

/// Standard genetic code, codon to one-letter amino acid (`*` = stop)
pub static CODON_TO_AA: phf::Map<&'static str, &'static str> = phf_map! {
    "AAA" => "K", "AAC" => "N", "AAG" => "K", "AAT" => "N",
    "ACA" => "T", "ACC" => "T", "ACG" => "T", "ACT" => "T",
    "AGA" => "R", "AGC" => "S", "AGG" => "R", "AGT" => "S",
    "ATA" => "I", "ATC" => "I", "ATG" => "M", "ATT" => "I",
    "CAA" => "Q", "CAC" => "H", "CAG" => "Q", "CAT" => "H",
    "CCA" => "P", "CCC" => "P", "CCG" => "P", "CCT" => "P",
    "CGA" => "R", "CGC" => "R", "CGG" => "R", "CGT" => "R",
    "CTA" => "L", "CTC" => "L", "CTG" => "L", "CTT" => "L",
    "GAA" => "E", "GAC" => "D", "GAG" => "E", "GAT" => "D",
    "GCA" => "A", "GCC" => "A", "GCG" => "A", "GCT" => "A",
    "GGA" => "G", "GGC" => "G", "GGG" => "G", "GGT" => "G",
    "GTA" => "V", "GTC" => "V", "GTG" => "V", "GTT" => "V",
    "TAA" => "*", "TAC" => "Y", "TAG" => "*", "TAT" => "Y",
    "TCA" => "S", "TCC" => "S", "TCG" => "S", "TCT" => "S",
    "TGA" => "*", "TGC" => "C", "TGG" => "W", "TGT" => "C",
    "TTA" => "L", "TTC" => "F", "TTG" => "L", "TTT" => "F",
};
