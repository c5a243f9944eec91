//! Plan description: one-line operator labels, the indented plan tree, and a
//! deterministic fingerprint derived from that tree.

use crate::db::executor::operator::PhysicalOperator;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Write as _};

///
/// PlanFingerprint
///
/// Stable SHA-256 fingerprint of a plan's description.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PlanFingerprint([u8; 32]);

impl PlanFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn as_hex(&self) -> String {
        let mut out = String::with_capacity(64);
        for byte in self.0 {
            let _ = write!(out, "{byte:02x}");
        }
        out
    }

    /// First 8 bytes as hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        let mut hex = self.as_hex();
        hex.truncate(16);
        hex
    }
}

impl Display for PlanFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_hex())
    }
}

impl PhysicalOperator {
    /// Indented tree, root first, one operator per line.
    #[must_use]
    pub fn describe_plan(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self, 0usize)];
        while let Some((operator, depth)) = stack.pop() {
            for _ in 0..depth {
                out.push_str("  ");
            }
            let _ = writeln!(out, "{operator}");
            for input in operator.input_operators().into_iter().rev() {
                stack.push((input, depth + 1));
            }
        }

        out
    }

    #[must_use]
    pub fn fingerprint(&self) -> PlanFingerprint {
        let mut hasher = Sha256::new();
        hasher.update(b"planfp:v1");
        self.hash_into(&mut hasher);
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);

        PlanFingerprint(out)
    }

    // Operator tag plus its one-line label, pre-order.
    fn hash_into(&self, hasher: &mut Sha256) {
        hasher.update([self.kind().tag()]);
        let label = self.to_string();
        let len = u32::try_from(label.len()).unwrap_or(u32::MAX);
        hasher.update(len.to_be_bytes());
        hasher.update(label.as_bytes());

        let inputs = self.input_operators();
        hasher.update([u8::try_from(inputs.len()).unwrap_or(u8::MAX)]);
        for input in inputs {
            input.hash_into(hasher);
        }
    }
}

impl Display for PhysicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Values(plan) => write!(f, "Values({} rows)", plan.rows().len()),
            Self::GroupScan(plan) => write!(f, "GroupScan({})", plan.root_name()),
            Self::IndexScan(plan) => write!(f, "IndexScan({})", plan.index().name()),
            Self::Cut(plan) => write!(f, "Cut({})", plan.boundary_name()),
            Self::Extract(plan) => write!(f, "Extract({})", plan.type_names().join(", ")),
            Self::Limit(plan) => write!(f, "Limit({})", plan.limit()),
            Self::AncestorLookup(plan) => {
                write!(
                    f,
                    "AncestorLookup({} -> {}",
                    plan.input_name(),
                    plan.ancestor_names().join(", ")
                )?;
                if plan.keep_input() {
                    write!(f, "; keep input")?;
                }
                write!(f, ")")
            }
        }
    }
}
