// Shared fixtures for the integration tests: encoded sequence pairs with
// 20-base tail sections, the way the alignment surface is driven in
// practice (payload section first, then a tail section per side so the band
// can run past the payload).
#![allow(dead_code)]

use banded_align::section::{encode_seq, Section, SeqLimit};

pub const LIM: SeqLimit = SeqLimit(0x8000_0000_0000);

pub struct SeqPair {
    a: Vec<u8>,
    b: Vec<u8>,
    alen: usize,
    blen: usize,
}

impl SeqPair {
    pub fn new(a: &str, b: &str) -> Self {
        let a_full = format!("{a}{}", "G".repeat(20));
        let b_full = format!("{b}{}", "C".repeat(20));
        SeqPair {
            a: encode_seq(&a_full),
            b: encode_seq(&b_full),
            alen: a.len(),
            blen: b.len(),
        }
    }

    pub fn afsec(&self) -> Section<'_> {
        Section::build(0, &self.a[..self.alen])
    }

    pub fn aftail(&self) -> Section<'_> {
        Section::build(2, &self.a[self.alen..])
    }

    pub fn bfsec(&self) -> Section<'_> {
        Section::build(4, &self.b[..self.blen])
    }

    pub fn bftail(&self) -> Section<'_> {
        Section::build(6, &self.b[self.blen..])
    }
}

pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
