use ethers::prelude::*;

// Chainlink VRFCoordinatorV2Mock, as deployed on development networks
abigen!(
    VRFCoordinatorV2Mock,
    r#"[
        function createSubscription() external returns (uint64 subId)
        function fundSubscription(uint64 subId, uint96 amount) external
        function addConsumer(uint64 subId, address consumer) external
        event SubscriptionCreated(uint64 indexed subId, address owner)
    ]"#
);

/// LINK paid per request by the mock (0.25 LINK).
pub const MOCK_BASE_FEE_WEI: u128 = 250_000_000_000_000_000;

/// LINK per gas charged by the mock.
pub const MOCK_GAS_PRICE_LINK: u128 = 1_000_000_000;

/// Funding given to a freshly created development subscription, in LINK.
pub const SUBSCRIPTION_FUND_AMOUNT: &str = "40";
