use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

/// Largest lane count a beatmap may declare.
pub const MAX_LANES: usize = 10;

// Keyboard codes (ASCII for printable keys)
pub mod keys {
    pub const ESCAPE: u32 = 27;
    pub const SPACE: u32 = 32;
    pub const SEMICOLON: u32 = 59;
    pub const A: u32 = 97;
    pub const D: u32 = 100;
    pub const F: u32 = 102;
    pub const J: u32 = 106;
    pub const K: u32 = 107;
    pub const L: u32 = 108;
    pub const N: u32 = 110;
    pub const S: u32 = 115;
    pub const V: u32 = 118;
}

use keys::*;

const DEFAULT_LAYOUTS: [&[u32]; MAX_LANES] = [
    &[SPACE],
    &[F, J],
    &[F, SPACE, J],
    &[D, F, J, K],
    &[D, F, SPACE, J, K],
    &[S, D, F, J, K, L],
    &[S, D, F, SPACE, J, K, L],
    &[A, S, D, F, J, K, L, SEMICOLON],
    &[A, S, D, F, SPACE, J, K, L, SEMICOLON],
    &[A, S, D, F, V, N, J, K, L, SEMICOLON],
];

/// Key bindings for every supported lane count plus the exit key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(default)]
pub struct KeyConfig {
    /// Lane count -> one key code per lane
    pub lanes: BTreeMap<usize, Vec<u32>>,
    pub exit: u32,
}

impl Default for KeyConfig {
    fn default() -> Self {
        let lanes = DEFAULT_LAYOUTS
            .iter()
            .enumerate()
            .map(|(i, layout)| (i + 1, layout.to_vec()))
            .collect();
        Self { lanes, exit: ESCAPE }
    }
}

impl KeyConfig {
    /// Bindings for a beatmap with `lane_count` lanes, if configured.
    pub fn keys_for(&self, lane_count: usize) -> Option<&[u32]> {
        self.lanes.get(&lane_count).map(Vec::as_slice)
    }

    pub fn validate(&mut self) {
        self.lanes.retain(|&count, keys| {
            let ok = (1..=MAX_LANES).contains(&count) && keys.len() == count;
            if !ok {
                warn!(
                    "Dropping {}K key binding with {} keys",
                    count,
                    keys.len()
                );
            }
            ok
        });
        for (count, layout) in DEFAULT_LAYOUTS.iter().enumerate() {
            self.lanes
                .entry(count + 1)
                .or_insert_with(|| layout.to_vec());
        }
    }
}
