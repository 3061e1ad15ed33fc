use blake3;
use std::hash::{Hash, Hasher};

pub trait DigestHasher {
    fn input<I: Hash>(&mut self, input: I);
}

impl DigestHasher for blake3::Hasher {
    fn input<I: Hash>(&mut self, input: I) {
        struct StdHasher<'a>(&'a mut blake3::Hasher);

        impl<'a> Hasher for StdHasher<'a> {
            // Only used as a byte sink, the digest comes from `finalize`.
            fn finish(&self) -> u64 {
                0
            }

            fn write(&mut self, bytes: &[u8]) {
                self.0.update(bytes);
            }
        }

        input.hash(&mut StdHasher(self))
    }
}
