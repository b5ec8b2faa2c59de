//! Share-token primitive: asset identities, holdings, mint, burn, transfer.
//!
//! Mint and burn require the mint authority, which is always a derived
//! address. A derived address has no private key, so the settlement program
//! "signs" for it by presenting the seeds and bump that produce it.

use synthswap_types::{
    Address, AssetMint, Result, SynthswapError, TokenHolding, create_derived_address,
};

use crate::transaction::Transaction;

/// Who is authorizing a token operation.
#[derive(Debug, Clone, Copy)]
pub enum TokenAuthority<'s> {
    /// The transaction signer.
    Signer,
    /// A derived address, proven by its seeds and bump.
    Derived { seeds: &'s [&'s [u8]], bump: u8 },
}

impl TokenAuthority<'_> {
    /// Resolve the authority to the address it speaks for.
    pub fn resolve(&self, tx: &Transaction<'_>) -> Result<Address> {
        match self {
            Self::Signer => Ok(tx.signer()),
            Self::Derived { seeds, bump } => create_derived_address(seeds, *bump),
        }
    }
}

/// Create a new asset identity with zero supply.
pub fn create_mint(
    tx: &mut Transaction<'_>,
    mint: &Address,
    payer: &Address,
    mint_authority: Address,
    decimals: u8,
) -> Result<()> {
    tx.create(
        mint,
        payer,
        AssetMint {
            mint_authority,
            supply: 0,
            decimals,
        },
    )
}

/// Create an empty holding of `mint` for `owner`.
pub fn create_holding(
    tx: &mut Transaction<'_>,
    holding: &Address,
    payer: &Address,
    mint: Address,
    owner: Address,
) -> Result<()> {
    tx.load::<AssetMint>(&mint)?;
    tx.create(holding, payer, TokenHolding::new(mint, owner))
}

/// Create the holding only if nothing exists at `holding` yet. Returns
/// whether it was created.
///
/// # Errors
/// Besides creation errors, returns `AddressMismatch` if an existing holding
/// belongs to a different mint or owner.
pub fn ensure_holding(
    tx: &mut Transaction<'_>,
    holding: &Address,
    payer: &Address,
    mint: Address,
    owner: Address,
) -> Result<bool> {
    if tx.has_record(holding)? {
        let existing: TokenHolding = tx.load(holding)?;
        check_holding(&existing, &mint)?;
        if existing.owner != owner {
            return Err(SynthswapError::AddressMismatch {
                expected: owner,
                actual: existing.owner,
            });
        }
        return Ok(false);
    }
    create_holding(tx, holding, payer, mint, owner)?;
    Ok(true)
}

/// Issue `amount` new shares into `holding`.
///
/// # Errors
/// `InvalidTokenAuthority` unless `authority` is the mint authority.
pub fn mint_to(
    tx: &mut Transaction<'_>,
    mint: &Address,
    holding: &Address,
    authority: TokenAuthority<'_>,
    amount: u64,
) -> Result<()> {
    let mut asset: AssetMint = tx.load(mint)?;
    require_mint_authority(tx, &asset, authority)?;
    let mut dest: TokenHolding = tx.load(holding)?;
    check_holding(&dest, mint)?;

    asset.supply = asset
        .supply
        .checked_add(amount)
        .ok_or(SynthswapError::ArithmeticOverflow {
            context: "mint supply",
        })?;
    dest.credit(amount)?;
    tx.save(mint, asset)?;
    tx.save(holding, dest)
}

/// Destroy `amount` shares held in `holding`.
///
/// Burning is gated on the mint authority rather than the holder: only the
/// settlement program destroys shares, and only out of its own escrow.
pub fn burn(
    tx: &mut Transaction<'_>,
    mint: &Address,
    holding: &Address,
    authority: TokenAuthority<'_>,
    amount: u64,
) -> Result<()> {
    let mut asset: AssetMint = tx.load(mint)?;
    require_mint_authority(tx, &asset, authority)?;
    let mut source: TokenHolding = tx.load(holding)?;
    check_holding(&source, mint)?;

    source.debit(amount)?;
    asset.supply = asset
        .supply
        .checked_sub(amount)
        .ok_or(SynthswapError::SupplyInvariantViolation {
            reason: format!("burning {amount} from supply {}", asset.supply),
        })?;
    tx.save(mint, asset)?;
    tx.save(holding, source)
}

/// Move `amount` shares between two holdings of the same mint. The
/// authority must be the source holding's owner.
pub fn transfer(
    tx: &mut Transaction<'_>,
    from: &Address,
    to: &Address,
    authority: TokenAuthority<'_>,
    amount: u64,
) -> Result<()> {
    let mut source: TokenHolding = tx.load(from)?;
    let mut dest: TokenHolding = tx.load(to)?;
    check_holding(&dest, &source.mint)?;
    let signer = authority.resolve(tx)?;
    if signer != source.owner {
        return Err(SynthswapError::InvalidTokenAuthority { authority: signer });
    }
    if from == to || amount == 0 {
        return Ok(());
    }
    source.debit(amount)?;
    dest.credit(amount)?;
    tx.save(from, source)?;
    tx.save(to, dest)
}

/// Current amount in `holding`.
pub fn balance(tx: &Transaction<'_>, holding: &Address) -> Result<u64> {
    Ok(tx.load::<TokenHolding>(holding)?.amount)
}

fn require_mint_authority(
    tx: &Transaction<'_>,
    asset: &AssetMint,
    authority: TokenAuthority<'_>,
) -> Result<()> {
    let resolved = authority.resolve(tx)?;
    if resolved != asset.mint_authority {
        return Err(SynthswapError::InvalidTokenAuthority {
            authority: resolved,
        });
    }
    Ok(())
}

fn check_holding(holding: &TokenHolding, mint: &Address) -> Result<()> {
    if holding.mint != *mint {
        return Err(SynthswapError::AddressMismatch {
            expected: *mint,
            actual: holding.mint,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountStore;
    use synthswap_types::fixtures::principal;
    use synthswap_types::{RentConfig, find_derived_address};

    const AUTH_SEED: &[u8] = b"authority";

    struct Setup {
        store: AccountStore,
        rent: RentConfig,
        payer: Address,
        mint: Address,
        authority: Address,
        bump: u8,
        alice: Address,
        bob: Address,
    }

    fn setup() -> Setup {
        let mut store = AccountStore::new();
        let payer = principal(1);
        store.airdrop(payer, 1_000_000).unwrap();
        let (authority, bump) = find_derived_address(&[AUTH_SEED]).unwrap();
        let (mint, _) = find_derived_address(&[b"mint"]).unwrap();
        let (alice, _) = find_derived_address(&[b"alice"]).unwrap();
        let (bob, _) = find_derived_address(&[b"bob"]).unwrap();
        let rent = RentConfig {
            lamports_per_byte: 0,
            account_overhead: 0,
        };
        let effects = {
            let mut tx = Transaction::new(&store, &rent, payer, [mint, alice, bob]);
            create_mint(&mut tx, &mint, &payer, authority, 0).unwrap();
            create_holding(&mut tx, &alice, &payer, mint, payer).unwrap();
            create_holding(&mut tx, &bob, &payer, mint, authority).unwrap();
            tx.into_effects()
        };
        store.commit(effects);
        Setup {
            store,
            rent,
            payer,
            mint,
            authority,
            bump,
            alice,
            bob,
        }
    }

    fn derived(s: &Setup) -> TokenAuthority<'static> {
        TokenAuthority::Derived {
            seeds: &[AUTH_SEED],
            bump: s.bump,
        }
    }

    #[test]
    fn mint_requires_authority() {
        let s = setup();
        let mut tx = Transaction::new(&s.store, &s.rent, s.payer, [s.mint, s.alice]);
        let err = mint_to(&mut tx, &s.mint, &s.alice, TokenAuthority::Signer, 10).unwrap_err();
        assert_eq!(
            err,
            SynthswapError::InvalidTokenAuthority { authority: s.payer }
        );
        let wrong_bump = TokenAuthority::Derived {
            seeds: &[AUTH_SEED],
            bump: s.bump.wrapping_sub(1),
        };
        assert!(mint_to(&mut tx, &s.mint, &s.alice, wrong_bump, 10).is_err());

        mint_to(&mut tx, &s.mint, &s.alice, derived(&s), 10).unwrap();
        assert_eq!(balance(&tx, &s.alice).unwrap(), 10);
        assert_eq!(tx.load::<AssetMint>(&s.mint).unwrap().supply, 10);
    }

    #[test]
    fn transfer_requires_owner() {
        let s = setup();
        let mut tx = Transaction::new(&s.store, &s.rent, s.payer, [s.mint, s.alice, s.bob]);
        mint_to(&mut tx, &s.mint, &s.alice, derived(&s), 100).unwrap();

        // bob's holding is owned by the derived authority, not the signer
        let err = transfer(&mut tx, &s.bob, &s.alice, TokenAuthority::Signer, 1).unwrap_err();
        assert!(matches!(err, SynthswapError::InvalidTokenAuthority { .. }));

        transfer(&mut tx, &s.alice, &s.bob, TokenAuthority::Signer, 60).unwrap();
        assert_eq!(balance(&tx, &s.alice).unwrap(), 40);
        assert_eq!(balance(&tx, &s.bob).unwrap(), 60);
    }

    #[test]
    fn burn_reduces_supply_and_holding() {
        let s = setup();
        let mut tx = Transaction::new(&s.store, &s.rent, s.payer, [s.mint, s.bob]);
        mint_to(&mut tx, &s.mint, &s.bob, derived(&s), 100).unwrap();
        burn(&mut tx, &s.mint, &s.bob, derived(&s), 30).unwrap();
        assert_eq!(balance(&tx, &s.bob).unwrap(), 70);
        assert_eq!(tx.load::<AssetMint>(&s.mint).unwrap().supply, 70);

        let err = burn(&mut tx, &s.mint, &s.bob, derived(&s), 71).unwrap_err();
        assert!(matches!(err, SynthswapError::InsufficientShares { .. }));
        assert_eq!(s.authority, create_derived_address(&[AUTH_SEED], s.bump).unwrap());
    }

    #[test]
    fn ensure_holding_is_idempotent() {
        let s = setup();
        let mut tx = Transaction::new(&s.store, &s.rent, s.payer, [s.mint, s.alice]);
        assert!(!ensure_holding(&mut tx, &s.alice, &s.payer, s.mint, s.payer).unwrap());
        let err = ensure_holding(&mut tx, &s.alice, &s.payer, s.mint, s.authority).unwrap_err();
        assert!(matches!(err, SynthswapError::AddressMismatch { .. }));
    }
}
