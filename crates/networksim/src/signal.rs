//! Control signal encoding and decoding.
//!
//! A control packet carries `{source, destination, control_code}`. In
//! abstract mode (the default, used for fast simulation) this triple is kept
//! as-is; in non-abstract mode it is packed into a fixed-width bit string, the
//! same representation a real optical control channel would carry.

use std::collections::BTreeMap;

/// A decoded control packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlTriple {
    /// Source node id.
    pub source: usize,
    /// Destination node id.
    pub destination: usize,
    /// Control code, e.g. `0` for "new data announcement".
    pub control_code: u32,
}

/// Encodes and decodes control packets, and holds the control-code
/// dictionary used to label codes for logging/Info output. Codes are
/// extensible through a user-supplied dictionary.
#[derive(Debug, Clone)]
pub struct ControlSignal {
    id_bits: u32,
    control_bits: u32,
    abstract_mode: bool,
    code_labels: BTreeMap<u32, String>,
}

/// Control code meaning "a new data packet has been announced".
pub const CODE_NEW_DATA: u32 = 0;
/// Control code meaning "a data packet has been removed/received".
pub const CODE_REMOVED_DATA: u32 = 1;

impl Default for ControlSignal {
    fn default() -> Self {
        ControlSignal::new(7, 2, true)
    }
}

impl ControlSignal {
    /// Construct a codec. `id_bits` and `control_bits` only matter in
    /// non-abstract mode, where they determine the zero-padded width of each
    /// field.
    pub fn new(id_bits: u32, control_bits: u32, abstract_mode: bool) -> Self {
        let mut code_labels = BTreeMap::new();
        code_labels.insert(CODE_NEW_DATA, "New Data".to_string());
        code_labels.insert(CODE_REMOVED_DATA, "Removed Data".to_string());
        ControlSignal {
            id_bits,
            control_bits,
            abstract_mode,
            code_labels,
        }
    }

    /// Replace the control-code dictionary wholesale.
    pub fn set_code_labels(&mut self, labels: BTreeMap<u32, String>) {
        self.code_labels = labels;
    }

    /// Look up the human-readable label for a control code, if known.
    pub fn label(&self, code: u32) -> Option<&str> {
        self.code_labels.get(&code).map(String::as_str)
    }

    /// `true` when this codec represents packets as `(source, destination,
    /// code)` triples instead of bit strings.
    pub fn is_abstract(&self) -> bool {
        self.abstract_mode
    }

    /// Encode a control triple. In abstract mode this is a pass-through; in
    /// non-abstract mode each field is zero-padded binary, concatenated in
    /// `source | destination | control_code` order.
    pub fn encode(&self, triple: ControlTriple) -> String {
        if self.abstract_mode {
            format!(
                "{},{},{}",
                triple.source, triple.destination, triple.control_code
            )
        } else {
            format!(
                "{:0id_width$b}{:0dest_width$b}{:0code_width$b}",
                triple.source,
                triple.destination,
                triple.control_code,
                id_width = self.id_bits as usize,
                dest_width = self.id_bits as usize,
                code_width = self.control_bits as usize,
            )
        }
    }

    /// Decode a string produced by [`Self::encode`]. Inverse of `encode`: for
    /// all valid triples, `decode(encode(t)) == t`.
    pub fn decode(&self, raw: &str) -> Option<ControlTriple> {
        if self.abstract_mode {
            let mut parts = raw.splitn(3, ',');
            let source = parts.next()?.parse().ok()?;
            let destination = parts.next()?.parse().ok()?;
            let control_code = parts.next()?.parse().ok()?;
            Some(ControlTriple {
                source,
                destination,
                control_code,
            })
        } else {
            let id_bits = self.id_bits as usize;
            let control_bits = self.control_bits as usize;
            if raw.len() != 2 * id_bits + control_bits {
                return None;
            }
            let source = usize::from_str_radix(&raw[0..id_bits], 2).ok()?;
            let destination = usize::from_str_radix(&raw[id_bits..2 * id_bits], 2).ok()?;
            let control_code =
                u32::from_str_radix(&raw[2 * id_bits..2 * id_bits + control_bits], 2).ok()?;
            Some(ControlTriple {
                source,
                destination,
                control_code,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abstract_round_trip() {
        let codec = ControlSignal::new(7, 2, true);
        for source in 0..128usize {
            for destination in [0usize, 1, 127] {
                for control_code in 0..4u32 {
                    let triple = ControlTriple {
                        source,
                        destination,
                        control_code,
                    };
                    let encoded = codec.encode(triple);
                    assert_eq!(codec.decode(&encoded), Some(triple));
                }
            }
        }
    }

    #[test]
    fn binary_round_trip() {
        let codec = ControlSignal::new(7, 2, false);
        let triple = ControlTriple {
            source: 42,
            destination: 7,
            control_code: 1,
        };
        let encoded = codec.encode(triple);
        assert_eq!(encoded.len(), 7 + 7 + 2);
        assert_eq!(codec.decode(&encoded), Some(triple));
    }

    #[test]
    fn default_labels() {
        let codec = ControlSignal::default();
        assert_eq!(codec.label(CODE_NEW_DATA), Some("New Data"));
        assert_eq!(codec.label(CODE_REMOVED_DATA), Some("Removed Data"));
        assert_eq!(codec.label(99), None);
    }
}
