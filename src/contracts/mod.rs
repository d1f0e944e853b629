pub mod vrf_coordinator;
pub mod vrf_mock;

pub use vrf_coordinator::VRFCoordinatorV2;
pub use vrf_mock::{
    SubscriptionCreatedFilter, VRFCoordinatorV2Mock, MOCK_BASE_FEE_WEI, MOCK_GAS_PRICE_LINK,
    SUBSCRIPTION_FUND_AMOUNT,
};
