//! Content of the "challenge other player" section of the web client.

use crate::error::{FightersError, Result};
use ethers::types::U256;
use ethers::utils::{parse_ether, parse_units, ParseUnits};

pub const CHALLENGE_HEADING: &str = "CHALLENGE OTHER PLAYER!!!";
pub const MINT_PAGE_HREF: &str = "/mintPage";
pub const MINT_LINK_TEXT: &str = "Mint a fighter!";
pub const BID_PLACEHOLDER: &str = "bid ammount (>0.01 ETH)";
pub const CHALLENGE_BUTTON_TEXT: &str = "Challenge to a fight!!!";

/// Bids must be strictly above this amount.
pub const MIN_BID_ETH: &str = "0.01";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub href: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeSection {
    pub heading: &'static str,
    pub mint_link: NavLink,
    pub bid_placeholder: &'static str,
    pub button_text: &'static str,
}

impl Default for ChallengeSection {
    fn default() -> Self {
        Self {
            heading: CHALLENGE_HEADING,
            mint_link: NavLink {
                href: MINT_PAGE_HREF,
                text: MINT_LINK_TEXT,
            },
            bid_placeholder: BID_PLACEHOLDER,
            button_text: CHALLENGE_BUTTON_TEXT,
        }
    }
}

/// Parses the bid input (in ETH) into wei.
pub fn parse_bid(input: &str) -> Result<U256> {
    let cleaned = input.trim().trim_end_matches("ETH").trim();
    if cleaned.is_empty() {
        return Err(FightersError::InvalidBid("empty bid".to_string()));
    }

    // Signed amounts come back as I256, whose bits would read as a huge U256
    let wei = match parse_units(cleaned, "ether") {
        Ok(ParseUnits::U256(wei)) => wei,
        Ok(ParseUnits::I256(_)) => {
            return Err(FightersError::InvalidBid(format!("{} is negative", input)))
        }
        Err(e) => return Err(FightersError::InvalidBid(format!("{}: {}", input, e))),
    };
    let minimum = parse_ether(MIN_BID_ETH)
        .map_err(|e| FightersError::InvalidBid(e.to_string()))?;

    if wei <= minimum {
        return Err(FightersError::InvalidBid(format!(
            "{} must be greater than {} ETH",
            input, MIN_BID_ETH
        )));
    }

    Ok(wei)
}
