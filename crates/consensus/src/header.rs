// Path: crates/consensus/src/header.rs
//! Fork-gated header validation.
//!
//! A header is checked in a fixed order and the first failure wins:
//!
//! 1. the authority difficulty sentinel,
//! 2. the external authority engine (signature, turn, votes),
//! 3. parent resolution,
//! 4. the [`ConstraintSet`] of the fork active at the header's number and timestamp.
//!
//! The constraint sets are data, built once per chain spec by [`ConstraintMatrix`], so
//! the rules of every fork can be inspected and tested without running a chain.

use std::fmt;
use std::sync::Arc;

use alloy_primitives::U256;
use tandem_api::chain::ChainHeaderReader;
use tandem_api::consensus::HeaderAuthority;
use tandem_api::fees::FeeRules;
use tandem_telemetry::{consensus_metrics, error_metrics, time::Timer};
use tandem_types::app::{FieldValue, Header, HeaderField};
use tandem_types::config::{ChainSpec, Fork};
use tandem_types::error::{ErrorCode, HeaderError, Presence};
use tandem_types::keys::{DIFF_IN_TURN, DIFF_NO_TURN, EMPTY_UNCLE_HASH};
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::fees::StandardFeeRules;

/// A recomputation delegated to the fee collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recompute {
    /// Gas-limit drift and base fee.
    FeeMarket,
    /// Blob gas used and excess blob gas.
    BlobFee,
}

/// What a constraint demands of its field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    MustBeZero,
    MustBePresent,
    MustBeAbsent,
    MustEqual(FieldValue),
    /// Strictly greater than the same field of the parent.
    MustBeGreaterThanParent,
    /// Exactly the parent's value plus one.
    MustFollowParent,
    AtMost(u64),
    /// No greater than another field of the same header.
    AtMostField(HeaderField),
    Recomputed(Recompute),
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::MustBeZero => f.write_str("must be zero"),
            Requirement::MustBePresent => f.write_str("must be present"),
            Requirement::MustBeAbsent => f.write_str("must be absent"),
            Requirement::MustEqual(value) => write!(f, "must equal {value}"),
            Requirement::MustBeGreaterThanParent => f.write_str("must be greater than parent"),
            Requirement::MustFollowParent => f.write_str("must be parent + 1"),
            Requirement::AtMost(limit) => write!(f, "must be at most {limit}"),
            Requirement::AtMostField(other) => write!(f, "must be at most {other}"),
            Requirement::Recomputed(Recompute::FeeMarket) => f.write_str("fee market recomputation"),
            Requirement::Recomputed(Recompute::BlobFee) => f.write_str("blob fee recomputation"),
        }
    }
}

/// One (field, requirement) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub field: HeaderField,
    pub requirement: Requirement,
}

impl Constraint {
    pub fn new(field: HeaderField, requirement: Requirement) -> Self {
        Self { field, requirement }
    }
}

/// The ordered constraints in force while a given fork is the most recent active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    fork: Fork,
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    /// Builds the set for `fork`: the base rules followed by the fork-gated field rules.
    pub fn for_fork(fork: Fork, max_gas_limit: u64) -> Self {
        use HeaderField::*;
        use Requirement::*;

        let mut constraints = vec![
            Constraint::new(UncleHash, MustEqual(FieldValue::Hash(EMPTY_UNCLE_HASH))),
            Constraint::new(Timestamp, MustBeGreaterThanParent),
            Constraint::new(GasLimit, AtMost(max_gas_limit)),
            Constraint::new(GasUsed, AtMostField(GasLimit)),
            Constraint::new(Number, MustFollowParent),
        ];

        if fork >= Fork::London {
            constraints.push(Constraint::new(BaseFee, MustBePresent));
            constraints.push(Constraint::new(BaseFee, Recomputed(Recompute::FeeMarket)));
        }

        constraints.push(Constraint::new(
            WithdrawalsRoot,
            if fork >= Fork::Shanghai { MustBePresent } else { MustBeAbsent },
        ));

        if fork >= Fork::Cancun {
            constraints.push(Constraint::new(ParentBeaconRoot, MustBePresent));
            constraints.push(Constraint::new(ExcessBlobGas, MustBePresent));
            constraints.push(Constraint::new(BlobGasUsed, MustBePresent));
            constraints.push(Constraint::new(ExcessBlobGas, Recomputed(Recompute::BlobFee)));
        } else {
            constraints.push(Constraint::new(ExcessBlobGas, MustBeAbsent));
            constraints.push(Constraint::new(BlobGasUsed, MustBeAbsent));
            constraints.push(Constraint::new(ParentBeaconRoot, MustBeAbsent));
        }

        Self { fork, constraints }
    }

    pub fn fork(&self) -> Fork {
        self.fork
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// All requirements placed on `field`, in check order.
    pub fn requirements_for(&self, field: HeaderField) -> impl Iterator<Item = &Requirement> {
        self.constraints
            .iter()
            .filter(move |c| c.field == field)
            .map(|c| &c.requirement)
    }
}

/// One constraint set per fork, selected by the chain's fork schedule.
#[derive(Debug, Clone)]
pub struct ConstraintMatrix {
    spec: ChainSpec,
    genesis: ConstraintSet,
    london: ConstraintSet,
    shanghai: ConstraintSet,
    cancun: ConstraintSet,
}

impl ConstraintMatrix {
    pub fn new(spec: ChainSpec) -> Self {
        let max = spec.max_gas_limit;
        Self {
            genesis: ConstraintSet::for_fork(Fork::Genesis, max),
            london: ConstraintSet::for_fork(Fork::London, max),
            shanghai: ConstraintSet::for_fork(Fork::Shanghai, max),
            cancun: ConstraintSet::for_fork(Fork::Cancun, max),
            spec,
        }
    }

    pub fn spec(&self) -> &ChainSpec {
        &self.spec
    }

    pub fn set(&self, fork: Fork) -> &ConstraintSet {
        match fork {
            Fork::Genesis => &self.genesis,
            Fork::London => &self.london,
            Fork::Shanghai => &self.shanghai,
            Fork::Cancun => &self.cancun,
        }
    }

    /// The set in force for a header at `number` and `timestamp`.
    pub fn active(&self, number: u64, timestamp: u64) -> &ConstraintSet {
        self.set(self.spec.active_fork(number, timestamp))
    }
}

/// Validates headers against the authority engine and the fork-gated constraint matrix.
pub struct HeaderConstraintEngine<A: HeaderAuthority> {
    authority: Arc<A>,
    matrix: ConstraintMatrix,
    fees: Arc<dyn FeeRules>,
}

impl<A: HeaderAuthority> HeaderConstraintEngine<A> {
    /// An engine using the standard fee rules.
    pub fn new(authority: Arc<A>, spec: ChainSpec) -> Self {
        Self {
            authority,
            matrix: ConstraintMatrix::new(spec),
            fees: Arc::new(StandardFeeRules),
        }
    }

    /// Replaces the fee-market and blob-fee recomputation collaborator.
    pub fn with_fee_rules(mut self, fees: Arc<dyn FeeRules>) -> Self {
        self.fees = fees;
        self
    }

    pub fn matrix(&self) -> &ConstraintMatrix {
        &self.matrix
    }

    /// Verifies a single header, recording the outcome in the consensus metrics.
    pub fn verify_header(
        &self,
        chain: &dyn ChainHeaderReader,
        header: &Header,
    ) -> Result<(), HeaderError> {
        let _timer = Timer::new(consensus_metrics());
        let result = self.verify_inner(chain, header);
        match &result {
            Ok(()) => {
                consensus_metrics().inc_headers_verified();
                trace!(target: "consensus", number = header.number, "Header verified");
            }
            Err(e) => {
                consensus_metrics().inc_header_rejected(e.mechanism().as_str());
                error_metrics().inc_error("header", e.code());
                debug!(
                    target: "consensus",
                    number = header.number,
                    mechanism = %e.mechanism(),
                    error = %e,
                    "Header rejected"
                );
            }
        }
        result
    }

    fn verify_inner(&self, chain: &dyn ChainHeaderReader, header: &Header) -> Result<(), HeaderError> {
        match header.difficulty {
            Some(d) if d == DIFF_IN_TURN || d == DIFF_NO_TURN => {}
            got => return Err(HeaderError::InvalidDifficulty { got }),
        }

        self.authority.verify_header(chain, header)?;

        let parent = header
            .number
            .checked_sub(1)
            .and_then(|number| chain.header(header.parent_hash, number))
            .ok_or(HeaderError::UnknownAncestor {
                parent_hash: header.parent_hash,
                number: header.number,
            })?;

        let set = self.matrix.active(header.number, header.timestamp);
        self.verify_against(header, &parent, set)
    }

    /// Applies every constraint of `set` to `header`, in order.
    pub fn verify_against(
        &self,
        header: &Header,
        parent: &Header,
        set: &ConstraintSet,
    ) -> Result<(), HeaderError> {
        for constraint in set.constraints() {
            self.check(constraint, set.fork(), header, parent)?;
        }
        Ok(())
    }

    fn check(
        &self,
        constraint: &Constraint,
        fork: Fork,
        header: &Header,
        parent: &Header,
    ) -> Result<(), HeaderError> {
        let field = constraint.field;
        let value = header.field(field);
        let violation = |detail: String| HeaderError::StakeFieldViolation {
            field,
            requirement: constraint.requirement.to_string(),
            detail,
        };

        match &constraint.requirement {
            Requirement::MustBePresent if value.is_none() => Err(HeaderError::ForkConsistency {
                field,
                fork,
                expected: Presence::Present,
            }),
            Requirement::MustBeAbsent if value.is_some() => Err(HeaderError::ForkConsistency {
                field,
                fork,
                expected: Presence::Absent,
            }),
            Requirement::MustBePresent | Requirement::MustBeAbsent => Ok(()),
            Requirement::MustBeZero => match value {
                Some(v) if !v.is_zero() => Err(violation(format!("have {v}"))),
                _ => Ok(()),
            },
            Requirement::MustEqual(expected) => {
                if value == Some(*expected) {
                    Ok(())
                } else {
                    Err(violation(format!("have {}, want {expected}", show(value))))
                }
            }
            Requirement::MustBeGreaterThanParent => {
                let parent_value = parent.field(field);
                match (int(value), int(parent_value)) {
                    (Some(v), Some(p)) if v > p => Ok(()),
                    _ => Err(violation(format!(
                        "have {}, parent {}",
                        show(value),
                        show(parent_value)
                    ))),
                }
            }
            Requirement::MustFollowParent => {
                let parent_value = parent.field(field);
                let expected = int(parent_value).and_then(|p| p.checked_add(U256::from(1)));
                match (int(value), expected) {
                    (Some(v), Some(e)) if v == e => Ok(()),
                    _ => Err(violation(format!(
                        "have {}, parent {}",
                        show(value),
                        show(parent_value)
                    ))),
                }
            }
            Requirement::AtMost(limit) => match int(value) {
                Some(v) if v <= U256::from(*limit) => Ok(()),
                _ => Err(violation(format!("have {}, limit {limit}", show(value)))),
            },
            Requirement::AtMostField(other) => {
                let bound = header.field(*other);
                match (int(value), int(bound)) {
                    (Some(v), Some(b)) if v <= b => Ok(()),
                    _ => Err(violation(format!(
                        "have {}, {other} {}",
                        show(value),
                        show(bound)
                    ))),
                }
            }
            Requirement::Recomputed(kind) => {
                let spec = self.matrix.spec();
                let outcome = match kind {
                    Recompute::FeeMarket => self.fees.verify_fee_market(spec, parent, header),
                    Recompute::BlobFee => self.fees.verify_blob_fee(spec, parent, header),
                };
                outcome.map_err(|v| HeaderError::StakeFieldViolation {
                    field: v.field,
                    requirement: constraint.requirement.to_string(),
                    detail: v.detail,
                })
            }
        }
    }
}

impl<A: HeaderAuthority + 'static> HeaderConstraintEngine<A> {
    /// Verifies `headers` in order in the background.
    ///
    /// Returns the abort switch and the results channel. One result is sent per header
    /// in input order; once `true` is sent on the switch, no further header is started.
    /// The channel holds the whole batch, so verification never waits on the reader.
    ///
    /// Inside a Tokio runtime the batch runs as a spawned task. Elsewhere it runs on a
    /// dedicated thread, and the caller can drain the channel with `blocking_recv`.
    pub fn verify_headers(
        self: Arc<Self>,
        chain: Arc<dyn ChainHeaderReader>,
        headers: Vec<Header>,
    ) -> (
        watch::Sender<bool>,
        mpsc::Receiver<Result<(), HeaderError>>,
    ) {
        let (abort_tx, abort_rx) = watch::channel(false);
        let (results_tx, results_rx) = mpsc::channel(headers.len().max(1));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    let total = headers.len();
                    for (i, header) in headers.into_iter().enumerate() {
                        if *abort_rx.borrow() {
                            debug!(target: "consensus", verified = i, total, "Batch verification aborted");
                            return;
                        }
                        let result = self.verify_header(chain.as_ref(), &header);
                        if results_tx.send(result).await.is_err() {
                            return;
                        }
                        tokio::task::yield_now().await;
                    }
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    let total = headers.len();
                    for (i, header) in headers.into_iter().enumerate() {
                        if *abort_rx.borrow() {
                            debug!(target: "consensus", verified = i, total, "Batch verification aborted");
                            return;
                        }
                        let result = self.verify_header(chain.as_ref(), &header);
                        if results_tx.blocking_send(result).is_err() {
                            return;
                        }
                    }
                });
            }
        }

        (abort_tx, results_rx)
    }
}

fn int(value: Option<FieldValue>) -> Option<U256> {
    value.and_then(|v| v.as_int())
}

fn show(value: Option<FieldValue>) -> String {
    value.map_or_else(|| "<none>".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_set_starts_with_base_rules() {
        for fork in Fork::ALL {
            let set = ConstraintSet::for_fork(fork, 1_000);
            let fields: Vec<_> = set.constraints().iter().take(5).map(|c| c.field).collect();
            assert_eq!(
                fields,
                vec![
                    HeaderField::UncleHash,
                    HeaderField::Timestamp,
                    HeaderField::GasLimit,
                    HeaderField::GasUsed,
                    HeaderField::Number
                ]
            );
            assert!(set
                .requirements_for(HeaderField::GasLimit)
                .any(|r| *r == Requirement::AtMost(1_000)));
        }
    }

    #[test]
    fn withdrawals_root_flips_at_shanghai() {
        let req = |fork| {
            ConstraintSet::for_fork(fork, u64::MAX)
                .requirements_for(HeaderField::WithdrawalsRoot)
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(req(Fork::London), vec![Requirement::MustBeAbsent]);
        assert_eq!(req(Fork::Shanghai), vec![Requirement::MustBePresent]);
        assert_eq!(req(Fork::Cancun), vec![Requirement::MustBePresent]);
    }

    #[test]
    fn blob_fields_gated_by_cancun() {
        let shanghai = ConstraintSet::for_fork(Fork::Shanghai, u64::MAX);
        for field in [
            HeaderField::ExcessBlobGas,
            HeaderField::BlobGasUsed,
            HeaderField::ParentBeaconRoot,
        ] {
            assert_eq!(
                shanghai.requirements_for(field).collect::<Vec<_>>(),
                vec![&Requirement::MustBeAbsent]
            );
        }
        let cancun = ConstraintSet::for_fork(Fork::Cancun, u64::MAX);
        assert!(cancun
            .requirements_for(HeaderField::ExcessBlobGas)
            .any(|r| *r == Requirement::Recomputed(Recompute::BlobFee)));
    }

    #[test]
    fn base_fee_unconstrained_before_london() {
        let genesis = ConstraintSet::for_fork(Fork::Genesis, u64::MAX);
        assert_eq!(genesis.requirements_for(HeaderField::BaseFee).count(), 0);
        let london = ConstraintSet::for_fork(Fork::London, u64::MAX);
        assert_eq!(
            london.requirements_for(HeaderField::BaseFee).collect::<Vec<_>>(),
            vec![
                &Requirement::MustBePresent,
                &Requirement::Recomputed(Recompute::FeeMarket)
            ]
        );
    }

    fn custom(constraints: Vec<Constraint>) -> ConstraintSet {
        ConstraintSet {
            fork: Fork::Cancun,
            constraints,
        }
    }

    fn engine() -> HeaderConstraintEngine<tandem_test_utils::mocks::MockAuthority> {
        HeaderConstraintEngine::new(
            Arc::new(tandem_test_utils::mocks::MockAuthority::new()),
            ChainSpec::all_forks(1),
        )
    }

    #[test]
    fn must_be_zero_accepts_zero_and_absent() {
        let set = custom(vec![Constraint::new(HeaderField::BlobGasUsed, Requirement::MustBeZero)]);
        let parent = Header::default();
        let engine = engine();

        let mut header = Header {
            blob_gas_used: Some(0),
            ..Header::default()
        };
        assert!(engine.verify_against(&header, &parent, &set).is_ok());
        header.blob_gas_used = None;
        assert!(engine.verify_against(&header, &parent, &set).is_ok());

        header.blob_gas_used = Some(131_072);
        match engine.verify_against(&header, &parent, &set) {
            Err(HeaderError::StakeFieldViolation { field, requirement, detail }) => {
                assert_eq!(field, HeaderField::BlobGasUsed);
                assert_eq!(requirement, "must be zero");
                assert_eq!(detail, "have 131072");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn must_equal_compares_numeric_fields() {
        let set = custom(vec![Constraint::new(
            HeaderField::GasLimit,
            Requirement::MustEqual(FieldValue::from(30_000_000)),
        )]);
        let parent = Header::default();
        let engine = engine();

        let header = Header {
            gas_limit: 30_000_000,
            ..Header::default()
        };
        assert!(engine.verify_against(&header, &parent, &set).is_ok());

        let header = Header {
            gas_limit: 29_999_999,
            ..Header::default()
        };
        assert!(matches!(
            engine.verify_against(&header, &parent, &set),
            Err(HeaderError::StakeFieldViolation { field: HeaderField::GasLimit, .. })
        ));

        // An absent field never equals a value.
        let set = custom(vec![Constraint::new(
            HeaderField::BaseFee,
            Requirement::MustEqual(FieldValue::from(7)),
        )]);
        assert!(matches!(
            engine.verify_against(&Header::default(), &parent, &set),
            Err(HeaderError::StakeFieldViolation { field: HeaderField::BaseFee, .. })
        ));
    }

    #[test]
    fn first_failing_constraint_wins() {
        let set = custom(vec![
            Constraint::new(HeaderField::GasUsed, Requirement::MustBeZero),
            Constraint::new(HeaderField::GasLimit, Requirement::AtMost(0)),
        ]);
        let header = Header {
            gas_used: 1,
            gas_limit: 1,
            ..Header::default()
        };
        assert!(matches!(
            engine().verify_against(&header, &Header::default(), &set),
            Err(HeaderError::StakeFieldViolation { field: HeaderField::GasUsed, .. })
        ));
    }

    #[test]
    fn matrix_follows_schedule() {
        use tandem_types::config::Activation;
        let matrix = ConstraintMatrix::new(ChainSpec {
            london: Some(Activation::Block(5)),
            shanghai: Some(Activation::Timestamp(100)),
            cancun: Some(Activation::Timestamp(200)),
            ..ChainSpec::default()
        });
        assert_eq!(matrix.active(4, 500).fork(), Fork::Genesis);
        assert_eq!(matrix.active(5, 99).fork(), Fork::London);
        assert_eq!(matrix.active(6, 100).fork(), Fork::Shanghai);
        assert_eq!(matrix.active(7, 200).fork(), Fork::Cancun);
    }
}
