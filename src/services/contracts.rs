// Fixed contract pair the frame talks to, with the ABI fragments it needs.

use ethers::abi::{Abi, Function, Token};
use ethers::types::{Address, U256};

use crate::{
    config::Config,
    error::{AppError, Result},
    models::BurnTransaction,
    services::onchain::parse_address,
};

const MOXIE_TOKEN_ABI: &str = r#"[
  {
    "inputs": [
      { "internalType": "address", "name": "owner", "type": "address" },
      { "internalType": "address", "name": "spender", "type": "address" }
    ],
    "name": "allowance",
    "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
    "stateMutability": "view",
    "type": "function"
  },
  {
    "inputs": [
      { "internalType": "address", "name": "spender", "type": "address" },
      { "internalType": "uint256", "name": "value", "type": "uint256" }
    ],
    "name": "approve",
    "outputs": [{ "internalType": "bool", "name": "", "type": "bool" }],
    "stateMutability": "nonpayable",
    "type": "function"
  },
  {
    "inputs": [{ "internalType": "address", "name": "account", "type": "address" }],
    "name": "balanceOf",
    "outputs": [{ "internalType": "uint256", "name": "", "type": "uint256" }],
    "stateMutability": "view",
    "type": "function"
  }
]"#;

const BONDING_CURVE_ABI: &str = r#"[
  {
    "inputs": [
      { "internalType": "address", "name": "_subject", "type": "address" },
      { "internalType": "uint256", "name": "_depositAmount", "type": "uint256" },
      { "internalType": "address", "name": "_onBehalfOf", "type": "address" },
      { "internalType": "uint256", "name": "_minReturnAmountAfterFee", "type": "uint256" }
    ],
    "name": "buySharesFor",
    "outputs": [{ "internalType": "uint256", "name": "shares_", "type": "uint256" }],
    "stateMutability": "nonpayable",
    "type": "function"
  }
]"#;

#[derive(Debug, Clone)]
pub struct ContractSet {
    pub chain_id: u64,
    pub token_address: Address,
    pub bonding_curve_address: Address,
    token_abi: Abi,
    bonding_curve_abi: Abi,
}

impl ContractSet {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            chain_id: config.chain_id,
            token_address: parse_address(&config.moxie_token_address)?,
            bonding_curve_address: parse_address(&config.moxie_bonding_curve_address)?,
            token_abi: parse_abi(MOXIE_TOKEN_ABI)?,
            bonding_curve_abi: parse_abi(BONDING_CURVE_ABI)?,
        })
    }

    /// CAIP-2 chain reference, e.g. `eip155:8453`.
    pub fn caip_chain_id(&self) -> String {
        format!("eip155:{}", self.chain_id)
    }

    pub fn token_abi_json(&self) -> Result<serde_json::Value> {
        abi_json(MOXIE_TOKEN_ABI)
    }

    pub fn bonding_curve_abi_json(&self) -> Result<serde_json::Value> {
        abi_json(BONDING_CURVE_ABI)
    }

    pub fn encode_approve(&self, spender: Address, amount: U256) -> Result<Vec<u8>> {
        let function = lookup(&self.token_abi, "approve")?;
        function
            .encode_input(&[Token::Address(spender), Token::Uint(amount)])
            .map_err(|e| AppError::Internal(format!("approve encoding failed: {}", e)))
    }

    pub fn encode_buy_shares_for(&self, burn: &BurnTransaction) -> Result<Vec<u8>> {
        let function = self.buy_shares_for()?;
        function
            .encode_input(&[
                Token::Address(burn.subject_address),
                Token::Uint(burn.deposit_amount),
                Token::Address(burn.on_behalf_of),
                Token::Uint(burn.min_return_amount_after_fee),
            ])
            .map_err(|e| AppError::Internal(format!("buySharesFor encoding failed: {}", e)))
    }

    /// Recovers `buySharesFor` arguments from raw call data (selector included).
    pub fn decode_buy_shares_for(&self, input: &[u8]) -> Result<BurnTransaction> {
        let function = self.buy_shares_for()?;
        if input.len() < 4 || input[..4] != function.short_signature() {
            return Err(AppError::BadRequest(
                "Call data is not a buySharesFor call".to_string(),
            ));
        }

        let tokens = function
            .decode_input(&input[4..])
            .map_err(|e| AppError::BadRequest(format!("Malformed buySharesFor data: {}", e)))?;
        let mut args = tokens.into_iter();
        let malformed = || AppError::BadRequest("Unexpected buySharesFor arguments".to_string());

        let subject_address = args.next().and_then(Token::into_address).ok_or_else(malformed)?;
        let deposit_amount = args.next().and_then(Token::into_uint).ok_or_else(malformed)?;
        let on_behalf_of = args.next().and_then(Token::into_address).ok_or_else(malformed)?;
        let min_return_amount_after_fee =
            args.next().and_then(Token::into_uint).ok_or_else(malformed)?;

        Ok(BurnTransaction {
            subject_address,
            deposit_amount,
            on_behalf_of,
            min_return_amount_after_fee,
        })
    }

    fn buy_shares_for(&self) -> Result<&Function> {
        lookup(&self.bonding_curve_abi, "buySharesFor")
    }
}

fn parse_abi(raw: &str) -> Result<Abi> {
    serde_json::from_str(raw).map_err(|e| AppError::Internal(format!("Invalid ABI: {}", e)))
}

fn abi_json(raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|e| AppError::Internal(format!("Invalid ABI: {}", e)))
}

fn lookup<'a>(abi: &'a Abi, name: &str) -> Result<&'a Function> {
    abi.function(name)
        .map_err(|e| AppError::Internal(format!("ABI has no {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn contracts() -> ContractSet {
        ContractSet::from_config(&test_config()).unwrap()
    }

    #[test]
    fn caip_chain_id_uses_base() {
        assert_eq!(contracts().caip_chain_id(), "eip155:8453");
    }

    #[test]
    fn approve_uses_erc20_selector() {
        let data = contracts()
            .encode_approve(Address::repeat_byte(1), U256::exp10(50))
            .unwrap();
        // approve(address,uint256)
        assert_eq!(&data[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(data.len(), 4 + 32 * 2);
    }

    #[test]
    fn buy_shares_for_decodes_what_it_encodes() {
        let set = contracts();
        let amount = U256::from(25u8) * U256::exp10(17);
        let burn = BurnTransaction::new(Address::repeat_byte(9), amount);

        let data = set.encode_buy_shares_for(&burn).unwrap();
        let decoded = set.decode_buy_shares_for(&data).unwrap();

        assert_eq!(decoded, burn);
        // depositAmount occupies the second 32-byte word
        let mut word = [0u8; 32];
        amount.to_big_endian(&mut word);
        assert_eq!(&data[4 + 32..4 + 64], &word);
    }

    #[test]
    fn decode_rejects_foreign_selector() {
        let set = contracts();
        let approve = set
            .encode_approve(Address::repeat_byte(1), U256::one())
            .unwrap();
        assert!(set.decode_buy_shares_for(&approve).is_err());
        assert!(set.decode_buy_shares_for(&[0x01, 0x02]).is_err());
    }

    #[test]
    fn abi_json_round_trips_function_names() {
        let json = contracts().bonding_curve_abi_json().unwrap();
        assert_eq!(json[0]["name"], "buySharesFor");
    }
}
