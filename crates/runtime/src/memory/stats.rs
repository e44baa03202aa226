//! Stat list decoding.
//!
//! Raw stat entries are `(u16 layer, u16 kind, u32 value)`. The transform from
//! raw value to usable integer depends on the kind and is looked up in the
//! central [`STAT_TABLE`]. Kinds missing from the table are passed through
//! unchanged and reported, never guessed.
use byteorder::{ByteOrder, LittleEndian};
use game_core::layout::StatListOffsets;
use game_core::{Anomaly, STAT_TABLE, Stat, StatEncoding, StatKind, Stats, UnitId};
use tracing::warn;

/// Result of decoding one raw stat value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedStat {
    pub stat: Stat,
    /// False when the kind has no entry in the stat table.
    pub known: bool,
}

/// Decodes one raw `(kind, value)` pair.
pub fn decode_stat(kind: StatKind, raw: u32) -> DecodedStat {
    match STAT_TABLE.iter().find(|d| d.kind == kind) {
        Some(descriptor) => DecodedStat {
            stat: Stat {
                kind,
                value: descriptor.encoding.decode(raw),
            },
            known: true,
        },
        None => DecodedStat {
            stat: Stat {
                kind,
                value: StatEncoding::Plain.decode(raw),
            },
            known: false,
        },
    }
}

/// Decodes a stat entry array.
///
/// Only base-layer entries are kept; the first entry of a kind wins. Trailing
/// bytes that do not form a full entry are ignored.
pub fn decode_stat_entries(unit: UnitId, bytes: &[u8], anomalies: &mut Vec<Anomaly>) -> Stats {
    let mut stats = Stats::new();
    for entry in bytes.chunks_exact(StatListOffsets::ENTRY_LEN) {
        let layer = LittleEndian::read_u16(&entry[0..2]);
        if layer != 0 {
            continue;
        }
        let kind = StatKind(LittleEndian::read_u16(&entry[2..4]));
        let raw = LittleEndian::read_u32(&entry[4..8]);

        let decoded = decode_stat(kind, raw);
        if !decoded.known {
            warn!(unit = %unit, kind = kind.0, raw, "unknown stat kind, passing raw value through");
            anomalies.push(Anomaly::UnknownStat { unit, kind, raw });
        }
        stats.insert(decoded.stat);
    }
    stats
}
