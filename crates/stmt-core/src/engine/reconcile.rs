//! Resolving a classified block into an amount and a balance.
//!
//! Classification alone cannot sign an amount reliably: column positions
//! are lost in text extraction and the filler-run heuristic is a proxy.
//! The reconciler tests debit/credit hypotheses against the running
//! balance and keeps whichever arithmetic holds. Balance confirmation
//! outranks every positional or keyword signal.

use rust_decimal::Decimal;
use tracing::trace;

use crate::models::profile::InstitutionProfile;
use crate::models::record::{ClassifiedLine, LineTag};

/// Matching tolerance for balance arithmetic: one cent, absorbing
/// rounding in the rendered figures.
const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The resolved content of one transaction block.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBlock {
    pub description_parts: Vec<String>,
    /// Signed amount: negative is a debit. None when the block carried
    /// a balance but no discernible amount and no running figure to
    /// difference against.
    pub amount: Option<Decimal>,
    /// Balance stated in (or arithmetically confirmed from) the block
    /// itself. None when only the running balance is available.
    pub balance: Option<Decimal>,
    /// False when the sign came from a positional or keyword fallback
    /// with no balance figure confirming it.
    pub verified: bool,
}

/// Resolve one block's classified lines against the running balance.
/// Returns None for blocks with no monetary content at all; those are
/// dropped without a record.
pub fn resolve(
    lines: &[ClassifiedLine],
    running: Option<Decimal>,
    profile: &InstitutionProfile,
) -> Option<ResolvedBlock> {
    let mut description_parts = Vec::new();
    let mut amounts: Vec<(Decimal, LineTag, bool)> = Vec::new();
    let mut stated_balance = None;

    for line in lines {
        match line.tag {
            LineTag::Description => description_parts.push(line.text.clone()),
            LineTag::Debit | LineTag::Credit => {
                if let Some(value) = line.value {
                    amounts.push((value, line.tag, line.provisional));
                }
            }
            LineTag::Balance => {
                if let Some(value) = line.value {
                    stated_balance = Some(value);
                }
            }
            LineTag::Noise => {}
        }
    }

    if let Some(balance) = stated_balance {
        return Some(resolve_against_balance(
            description_parts,
            &amounts,
            balance,
            running,
        ));
    }

    if amounts.is_empty() {
        return None;
    }

    // Two figures and a known running balance: the trailing bare figure
    // may be the balance column. Test each earlier figure against it.
    if amounts.len() >= 2 {
        if let (Some(run), Some(&(implied, _, true))) = (running, amounts.last()) {
            for &(magnitude, _, _) in &amounts[..amounts.len() - 1] {
                if let Some(signed) = confirm_sign(run, magnitude, implied) {
                    trace!("implied balance {implied} confirms amount {signed}");
                    return Some(ResolvedBlock {
                        description_parts,
                        amount: Some(signed),
                        balance: Some(implied),
                        verified: true,
                    });
                }
            }
        }
    }

    // No balance to confirm against: sign from the explicit tag, or for
    // provisional tags from the keyword tier, else keep the positional
    // guess.
    let (magnitude, tag, provisional) = amounts[0];
    let amount = if provisional {
        sign_from_keywords(&description_parts, magnitude, profile)
            .unwrap_or_else(|| apply_tag(magnitude, tag))
    } else {
        apply_tag(magnitude, tag)
    };

    Some(ResolvedBlock {
        description_parts,
        amount: Some(amount),
        balance: None,
        verified: !provisional,
    })
}

fn resolve_against_balance(
    description_parts: Vec<String>,
    amounts: &[(Decimal, LineTag, bool)],
    balance: Decimal,
    running: Option<Decimal>,
) -> ResolvedBlock {
    if let Some(run) = running {
        for &(magnitude, _, _) in amounts {
            if let Some(signed) = confirm_sign(run, magnitude, balance) {
                return ResolvedBlock {
                    description_parts,
                    amount: Some(signed),
                    balance: Some(balance),
                    verified: true,
                };
            }
        }
        // No figure matches the movement; trust the balances and take
        // their difference as the amount. Catches amounts mangled by
        // extraction and positional tags that pointed the wrong way.
        let delta = balance - run;
        let amount = if delta.is_zero() && amounts.is_empty() {
            None
        } else {
            Some(delta)
        };
        return ResolvedBlock {
            description_parts,
            amount,
            balance: Some(balance),
            verified: true,
        };
    }

    // No running balance yet (first block of a document without an
    // opening figure): take the strongest amount reading as-is.
    let chosen = amounts
        .iter()
        .find(|(_, _, provisional)| !provisional)
        .or_else(|| amounts.first());
    match chosen {
        Some(&(magnitude, tag, provisional)) => ResolvedBlock {
            description_parts,
            amount: Some(apply_tag(magnitude, tag)),
            balance: Some(balance),
            verified: !provisional,
        },
        None => ResolvedBlock {
            description_parts,
            amount: None,
            balance: Some(balance),
            verified: true,
        },
    }
}

/// Test both signs of `magnitude` against the movement from `running`
/// to `balance`. Returns the signed amount when one fits.
fn confirm_sign(running: Decimal, magnitude: Decimal, balance: Decimal) -> Option<Decimal> {
    if ((running + magnitude) - balance).abs() <= TOLERANCE {
        Some(magnitude)
    } else if ((running - magnitude) - balance).abs() <= TOLERANCE {
        Some(-magnitude)
    } else {
        None
    }
}

fn apply_tag(magnitude: Decimal, tag: LineTag) -> Decimal {
    match tag {
        LineTag::Debit => -magnitude,
        _ => magnitude,
    }
}

/// Last-resort signing from the profile's keyword lists.
fn sign_from_keywords(
    description_parts: &[String],
    magnitude: Decimal,
    profile: &InstitutionProfile,
) -> Option<Decimal> {
    let text = description_parts.join(" ").to_lowercase();
    if profile.credit_keywords.iter().any(|k| text.contains(k.as_str())) {
        return Some(magnitude);
    }
    if profile.debit_keywords.iter().any(|k| text.contains(k.as_str())) {
        return Some(-magnitude);
    }
    None
}
