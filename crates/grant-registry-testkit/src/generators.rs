//! Proptest generators for property-based testing.

use proptest::prelude::*;

use grant_registry_core::{Grant, GrantId, Identity, Keypair, Timestamp};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    keypair().prop_map(|kp| kp.identity())
}

/// Generate a random GrantId.
pub fn grant_id() -> impl Strategy<Value = GrantId> {
    any::<[u8; 32]>().prop_map(GrantId::from_bytes)
}

/// Generate a plausible data id.
pub fn data_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,23}".prop_map(String::from)
}

/// Generate a lock timestamp, with "no lock" weighted in.
pub fn locked_until() -> impl Strategy<Value = Timestamp> {
    prop_oneof![
        2 => Just(0u64),
        3 => 1u64..=2_000_000_000u64,
    ]
}

/// Parameters for generating a grant.
#[derive(Debug, Clone)]
pub struct GrantParams {
    pub owner_seed: [u8; 32],
    pub grantee_seed: [u8; 32],
    pub data_id: String,
    pub locked_until: Timestamp,
}

impl Arbitrary for GrantParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            any::<[u8; 32]>(),
            any::<[u8; 32]>(),
            data_id(),
            locked_until(),
        )
            .prop_map(|(owner_seed, grantee_seed, data_id, locked_until)| GrantParams {
                owner_seed,
                grantee_seed,
                data_id,
                locked_until,
            })
            .boxed()
    }
}

/// Build a grant from parameters.
pub fn grant_from_params(params: &GrantParams) -> Grant {
    Grant::new(
        Keypair::from_seed(&params.owner_seed).identity(),
        Keypair::from_seed(&params.grantee_seed).identity(),
        params.data_id.clone(),
        params.locked_until,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_grant_id_deterministic(params: GrantParams) {
            let g1 = grant_from_params(&params);
            let g2 = grant_from_params(&params);

            prop_assert_eq!(g1.compute_id(), g2.compute_id());
        }

        #[test]
        fn test_grant_id_unique_per_data_id(params: GrantParams, other in data_id()) {
            prop_assume!(params.data_id != other);

            let g1 = grant_from_params(&params);
            let g2 = Grant { data_id: other, ..g1.clone() };

            prop_assert_ne!(g1.compute_id(), g2.compute_id());
        }

        #[test]
        fn test_grant_id_unique_per_lock(params: GrantParams, other in locked_until()) {
            prop_assume!(params.locked_until != other);

            let g1 = grant_from_params(&params);
            let g2 = Grant { locked_until: other, ..g1.clone() };

            prop_assert_ne!(g1.compute_id(), g2.compute_id());
        }

        #[test]
        fn test_unlocked_iff_zero_or_strictly_past(params: GrantParams, now in 0u64..=3_000_000_000) {
            let grant = grant_from_params(&params);
            let expected = grant.locked_until == 0 || grant.locked_until < now;

            prop_assert_eq!(grant.is_unlocked(now), expected);
        }
    }
}
