use alloy::primitives::{Address, Log};
use alloy::sol_types::SolEvent;

use super::TransactionDetector;
use crate::alerts::{Finding, ALERT_ID};
use crate::events::{TransactionEvent, Transfer};

/// A known bot deployer and the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployer {
    pub address: Address,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMintConfig {
    /// Agent registry; transfers from any other contract are ignored.
    pub token_contract: Address,
    pub deployer: Deployer,
}

/// Reports agent registry mints to the configured deployer.
#[derive(Debug, Clone)]
pub struct AgentMintDetector {
    config: AgentMintConfig,
}

impl AgentMintDetector {
    pub fn new(token_contract: Address, deployer: Deployer) -> Self {
        Self {
            config: AgentMintConfig {
                token_contract,
                deployer,
            },
        }
    }

    /// Lazily yields one finding per qualifying mint, in log order.
    pub fn findings<'a>(&'a self, tx: &'a TransactionEvent) -> impl Iterator<Item = Finding> + 'a {
        tx.logs
            .iter()
            .filter(move |log| log.address == self.config.token_contract)
            .filter_map(decode_transfer)
            .filter(move |transfer| transfer.from == Address::ZERO && transfer.to == self.config.deployer.address)
            .map(move |transfer| self.finding(&transfer))
    }

    pub fn evaluate(&self, tx: &TransactionEvent) -> Vec<Finding> {
        self.findings(tx).collect()
    }

    fn finding(&self, transfer: &Transfer) -> Finding {
        let deployer = &self.config.deployer.name;
        Finding::info(
            "New agent",
            format!("A bot has been created by {}", deployer),
            ALERT_ID,
            deployer.as_str(),
        )
        .with_metadata("tokenId", transfer.tokenId)
        .with_metadata("deployer", deployer)
    }
}

/// Logs that do not match the ERC-721 `Transfer` layout are not mints.
fn decode_transfer(log: &Log) -> Option<Transfer> {
    Transfer::decode_log_data(&log.data, true).ok()
}

impl TransactionDetector for AgentMintDetector {
    fn name(&self) -> &'static str {
        "agent-mint"
    }

    fn check(&self, tx: &TransactionEvent) -> Vec<Finding> {
        self.evaluate(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Bytes, B256, U256};

    fn agent_registry() -> Address {
        Address::with_last_byte(0x93)
    }

    fn test_deployer() -> Deployer {
        Deployer {
            address: Address::with_last_byte(0x37),
            name: "TEST PROTOCOL".to_string(),
        }
    }

    fn transfer_log(contract: Address, from: Address, to: Address, token_id: U256) -> Log {
        let data = Transfer {
            from,
            to,
            tokenId: token_id,
        }
        .encode_log_data();
        Log { address: contract, data }
    }

    fn tx(logs: Vec<Log>) -> TransactionEvent {
        TransactionEvent::new(1, logs)
    }

    fn detector() -> AgentMintDetector {
        AgentMintDetector::new(agent_registry(), test_deployer())
    }

    #[test]
    fn empty_when_no_transfer_events() {
        let unrelated = Log::new_unchecked(
            agent_registry(),
            vec![B256::with_last_byte(0xba)],
            Bytes::new(),
        );

        assert!(detector().evaluate(&tx(vec![unrelated])).is_empty());
        assert!(detector().evaluate(&tx(vec![])).is_empty());
    }

    #[test]
    fn empty_when_transfer_is_not_a_mint() {
        let log = transfer_log(
            agent_registry(),
            Address::with_last_byte(0x65),
            test_deployer().address,
            U256::from(13789403024637u64),
        );

        assert!(detector().evaluate(&tx(vec![log])).is_empty());
    }

    #[test]
    fn empty_when_mint_goes_to_another_address() {
        let log = transfer_log(
            agent_registry(),
            Address::ZERO,
            Address::with_last_byte(0x54),
            U256::from(13789403024637u64),
        );

        assert!(detector().evaluate(&tx(vec![log])).is_empty());
    }

    #[test]
    fn finding_for_mint_to_deployer() {
        let log = transfer_log(agent_registry(), Address::ZERO, test_deployer().address, U256::from(13789403024637u64));

        let findings = detector().evaluate(&tx(vec![log]));

        let expected = Finding::info(
            "New agent",
            "A bot has been created by TEST PROTOCOL",
            "FORTA-1",
            "TEST PROTOCOL",
        )
        .with_metadata("tokenId", "13789403024637")
        .with_metadata("deployer", "TEST PROTOCOL");
        assert_eq!(findings, vec![expected]);
    }

    #[test]
    fn renders_token_ids_beyond_u64() {
        let token_id = (U256::from(1u64) << 128usize) + U256::from(1u64);
        let log = transfer_log(agent_registry(), Address::ZERO, test_deployer().address, token_id);

        let findings = detector().evaluate(&tx(vec![log]));

        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].metadata["tokenId"],
            "340282366920938463463374607431768211457"
        );
    }

    #[test]
    fn ignores_matching_transfer_from_other_contract() {
        let log = transfer_log(
            Address::with_last_byte(0x01),
            Address::ZERO,
            test_deployer().address,
            U256::from(1u64),
        );

        assert!(detector().evaluate(&tx(vec![log])).is_empty());
    }

    #[test]
    fn skips_erc20_shaped_transfer() {
        // Same signature, but the value is unindexed: three topics plus data.
        let value = U256::from(5u64);
        let log = Log::new_unchecked(
            agent_registry(),
            vec![
                Transfer::SIGNATURE_HASH,
                Address::ZERO.into_word(),
                test_deployer().address.into_word(),
            ],
            Bytes::from(value.to_be_bytes::<32>().to_vec()),
        );

        assert!(detector().evaluate(&tx(vec![log])).is_empty());
    }

    #[test]
    fn multiple_mints_keep_log_order() {
        let deployer = test_deployer().address;
        let logs = vec![
            transfer_log(agent_registry(), Address::ZERO, deployer, U256::from(3u64)),
            transfer_log(agent_registry(), Address::ZERO, Address::with_last_byte(0x77), U256::from(4u64)),
            transfer_log(agent_registry(), Address::ZERO, deployer, U256::from(1u64)),
            transfer_log(agent_registry(), Address::ZERO, deployer, U256::from(2u64)),
        ];

        let token_ids: Vec<String> = detector()
            .evaluate(&tx(logs))
            .into_iter()
            .map(|f| f.metadata["tokenId"].clone())
            .collect();

        assert_eq!(token_ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn findings_iterator_can_be_restarted() {
        let detector = detector();
        let event = tx(vec![transfer_log(agent_registry(), Address::ZERO, test_deployer().address, U256::from(9u64))]);

        assert_eq!(detector.findings(&event).count(), 1);
        assert_eq!(detector.findings(&event).count(), 1);
    }
}
