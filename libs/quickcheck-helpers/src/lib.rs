// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2019 Joyent, Inc.
// Copyright 2026 Edgecast Cloud LLC.

/// This module provides helper functions that generate pseudorandom output.
pub mod random {
    use quickcheck::{Arbitrary, Gen};

    /// Generate a random [`String`] of size `len` containing only lowercase
    /// alphanumeric characters (a-z, 0-9) using the provided generator `g`.
    pub fn string(g: &mut Gen, len: usize) -> String {
        (0..len)
            .map(|_| {
                let c = u8::arbitrary(g);
                match c % 36 {
                    n @ 0..=25 => (b'a' + n) as char,
                    n => (b'0' + (n - 26)) as char,
                }
            })
            .collect()
    }

    /// Pick a random value in `0..bound`. Returns 0 when `bound` is 0.
    pub fn below(g: &mut Gen, bound: u64) -> u64 {
        if bound == 0 {
            return 0;
        }
        u64::arbitrary(g) % bound
    }

    /// Shuffle `items` in place (Fisher-Yates) using the generator `g`.
    pub fn shuffle<T>(g: &mut Gen, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = below(g, i as u64 + 1) as usize;
            items.swap(i, j);
        }
    }
}
