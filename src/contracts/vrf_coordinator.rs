use ethers::prelude::*;

// Only what a deployer needs from the live coordinator
abigen!(
    VRFCoordinatorV2,
    r#"[
        function addConsumer(uint64 subId, address consumer) external
    ]"#
);
