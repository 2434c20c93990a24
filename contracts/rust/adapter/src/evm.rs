use std::fmt::Debug;

use alloy::sol_types::SolInterface;

use crate::bind::BindError;

/// Decode revert data of a failed contract interaction into the contract's custom errors.
pub trait DecodeRevert<T> {
    /// Replace a revert carrying one of `E`'s custom errors by an error naming it. Other errors
    /// pass through unchanged.
    fn maybe_decode_revert<E: SolInterface + Debug>(self) -> anyhow::Result<T>;
}

impl<T> DecodeRevert<T> for Result<T, BindError> {
    fn maybe_decode_revert<E: SolInterface + Debug>(self) -> anyhow::Result<T> {
        match self {
            Ok(ret) => Ok(ret),
            Err(err) => {
                let decoded = err
                    .as_revert_data()
                    .and_then(|data| E::abi_decode(&data, true).ok());
                match decoded {
                    Some(revert) => Err(anyhow::anyhow!("{err}: {revert:?}")),
                    None => Err(err.into()),
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::{primitives::Address, sol_types::SolInterface};

    use super::*;
    use crate::{
        sol_types::{
            Staking::{InvalidPoolStatus, StakeNotFound},
            StakingErrors,
        },
        testing::revert_error,
    };

    #[test]
    fn test_decodes_custom_error() {
        let staker = Address::repeat_byte(7);
        let data = StakingErrors::StakeNotFound(StakeNotFound { staker }).abi_encode();
        let res: Result<(), BindError> = Err(revert_error(&data).into());

        let err = res.maybe_decode_revert::<StakingErrors>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("StakeNotFound"), "{msg}");
        assert!(msg.contains(&format!("{staker}")), "{msg}");
    }

    #[test]
    fn test_decodes_error_with_arguments() {
        let data = StakingErrors::InvalidPoolStatus(InvalidPoolStatus {
            currentStatus: false,
            requiredStatus: true,
        })
        .abi_encode();
        let res: Result<(), BindError> = Err(revert_error(&data).into());
        let msg = res
            .maybe_decode_revert::<StakingErrors>()
            .unwrap_err()
            .to_string();
        assert!(msg.contains("InvalidPoolStatus"), "{msg}");
    }

    #[test]
    fn test_unknown_revert_passes_through() {
        // Selector of `Error(string)`, not a Staking custom error.
        let res: Result<(), BindError> = Err(revert_error(&[0x08, 0xc3, 0x79, 0xa0]).into());
        let err = res.maybe_decode_revert::<StakingErrors>().unwrap_err();
        assert!(err.downcast_ref::<BindError>().is_some());
    }

    #[test]
    fn test_ok_and_non_revert_errors_untouched() {
        let ok: Result<u8, BindError> = Ok(3);
        assert_eq!(ok.maybe_decode_revert::<StakingErrors>().unwrap(), 3);

        let res: Result<(), BindError> = Err(BindError::MissingSender);
        let err = res.maybe_decode_revert::<StakingErrors>().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BindError>(),
            Some(BindError::MissingSender)
        ));
    }
}
