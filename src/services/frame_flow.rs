use std::sync::Arc;

use crate::{
    constants::{ASPECT_RATIO_WIDE, MOXIE_DECIMALS},
    error::{AppError, Result},
    integrations::{IdentityProvider, TokenDirectory},
    models::{FanToken, FrameActionPayload, FrameButton, FrameScreen, ShareCard, TokenQuery},
    services::{reward::RewardCalculator, transaction_builder::TransactionBuilder},
    utils::{format_amount, path_segment, units_to_decimal},
};

/// Screen-by-screen state machine of the reward frame.
///
/// Nothing is kept between requests: every screen is rebuilt from the route,
/// the submitted payload and fresh lookups.
pub struct FrameFlow {
    frame_url: String,
    directory: Arc<dyn TokenDirectory>,
    identity: Arc<dyn IdentityProvider>,
    rewards: RewardCalculator,
    transactions: Arc<TransactionBuilder>,
}

impl FrameFlow {
    pub fn new(
        frame_url: String,
        directory: Arc<dyn TokenDirectory>,
        identity: Arc<dyn IdentityProvider>,
        rewards: RewardCalculator,
        transactions: Arc<TransactionBuilder>,
    ) -> Self {
        Self {
            frame_url,
            directory,
            identity,
            rewards,
            transactions,
        }
    }

    pub fn home(&self) -> FrameScreen {
        FrameScreen::new(self.url("/img-home"))
            .text_input("Search for a user or channel")
            .button(FrameButton::post("Search 🔎", self.url("/search-user-channel")))
    }

    pub async fn search(&self, payload: &FrameActionPayload) -> Result<FrameScreen> {
        let input = payload.input_text().unwrap_or_default();
        let query = TokenQuery::from_search_input(input)?;
        let token = resolve_fan_token(self.directory.as_ref(), &query.symbol())
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => {
                    AppError::NotFound(format!("No results found for {}.", input))
                }
                other => other,
            })?;
        tracing::info!(
            "Search result for {}: {} ({} holders)",
            query,
            token.name,
            token.holder_count
        );

        let symbol = path_segment(&query.symbol());
        Ok(FrameScreen::new(self.url(&format!("/img-seach-user-channel/{}", symbol)))
            .button(FrameButton::post(
                "Check amount to reward",
                self.url(&format!("/check-moxie-amount/{}", symbol)),
            )))
    }

    pub async fn check_amount(
        &self,
        symbol: &str,
        payload: &FrameActionPayload,
    ) -> Result<FrameScreen> {
        let query: TokenQuery = symbol.parse()?;
        let token = resolve_fan_token(self.directory.as_ref(), &query.symbol()).await?;

        let addresses = self.identity.verified_addresses(payload).await?;
        let selection = self.rewards.compute(&addresses).await?;
        let needs_approval = self
            .transactions
            .requires_approval(selection.top_address())
            .await?;

        let balance = selection.total_balance_display()?;
        let usd = selection.total_fiat_display();
        tracing::info!(
            "Reward for {}: {} MOXIE ({}) across {} address(es), approval needed: {}",
            query,
            balance,
            usd,
            selection.winning_addresses.len(),
            needs_approval
        );

        let symbol = path_segment(&query.symbol());
        let screen = FrameScreen::new(self.url(&format!(
            "/img-moxie-amount/{}/{}",
            path_segment(&balance),
            path_segment(&usd)
        )));

        if needs_approval {
            return Ok(screen.button(FrameButton::transaction(
                "Approve",
                self.url("/approve"),
                self.url(&format!("/check-moxie-amount/{}", symbol)),
            )));
        }

        let subject = format!("{:?}", token.subject_address);
        let share_url = self.url(&format!("/share-amount/{}", symbol));
        Ok(screen
            .text_input("Amount of MOXIE to reward")
            .button(FrameButton::transaction(
                "Reward 100%",
                self.url(&format!("/buy-n-burn-all/{}", subject)),
                share_url.clone(),
            ))
            .button(FrameButton::transaction(
                "Reward selected",
                self.url(&format!("/buy-n-burn-selected/{}", subject)),
                share_url,
            )))
    }

    /// Share card once the burn is readable on chain, the waiting screen until then.
    pub async fn share_amount(
        &self,
        symbol: &str,
        payload: &FrameActionPayload,
    ) -> Result<FrameScreen> {
        let query: TokenQuery = symbol.parse()?;
        let Some(tx_hash) = payload.transaction_hash() else {
            tracing::info!("Transaction still pending for {}: no hash yet", query);
            return Ok(self.waiting(&query, None));
        };

        let burned = match self.transactions.burned_amount(tx_hash).await {
            Ok(amount) => amount,
            Err(err) => {
                tracing::info!("Transaction {} not readable yet: {}", tx_hash, err);
                return Ok(self.waiting(&query, Some(tx_hash)));
            }
        };
        let total_burned = match units_to_decimal(burned, MOXIE_DECIMALS) {
            Ok(tokens) => format_amount(tokens),
            Err(err) => {
                tracing::warn!("Burn amount {} in {} not displayable: {}", burned, tx_hash, err);
                return Ok(self.waiting(&query, Some(tx_hash)));
            }
        };

        let fan_token = match resolve_fan_token(self.directory.as_ref(), &query.symbol()).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("Fan token {} unavailable after burn {}: {}", query, tx_hash, err);
                return Ok(self.waiting(&query, Some(tx_hash)));
            }
        };
        let card = ShareCard {
            fan_token,
            token_symbol: query.symbol(),
            total_burned,
        };
        tracing::info!("Burn confirmed for {}: {}", query, card.total_burned);

        Ok(FrameScreen::new(self.share_image(&card))
            .button(FrameButton::link("Share", card.compose_url(&self.frame_url)?))
            .button(FrameButton::post("Retry", self.url("/"))))
    }

    pub async fn share_by_user(&self, symbol: &str, burned: &str) -> Result<FrameScreen> {
        let query: TokenQuery = symbol.parse()?;
        let fan_token = resolve_fan_token(self.directory.as_ref(), &query.symbol()).await?;
        let card = ShareCard {
            fan_token,
            token_symbol: query.symbol(),
            total_burned: burned.trim().to_string(),
        };

        Ok(FrameScreen::new(self.share_image(&card))
            .button(FrameButton::post("Give it a try!", self.url("/"))))
    }

    fn waiting(&self, query: &TokenQuery, tx_hash: Option<&str>) -> FrameScreen {
        let screen = FrameScreen::new(self.url("/img-waiting"))
            .aspect_ratio(ASPECT_RATIO_WIDE)
            .button(FrameButton::post(
                "Refresh",
                self.url(&format!("/share-amount/{}", path_segment(&query.symbol()))),
            ));
        match tx_hash {
            Some(hash) => screen.state(hash),
            None => screen,
        }
    }

    fn share_image(&self, card: &ShareCard) -> String {
        self.url(&format!(
            "/img-share/{}/{}",
            path_segment(&card.token_symbol),
            path_segment(&card.total_burned)
        ))
    }

    fn url(&self, path: &str) -> String {
        if path == "/" {
            self.frame_url.clone()
        } else {
            format!("{}{}", self.frame_url, path)
        }
    }
}

/// Looks a fan token up by symbol; an empty result is a user-facing miss.
pub async fn resolve_fan_token(directory: &dyn TokenDirectory, symbol: &str) -> Result<FanToken> {
    match directory.find_by_symbol(symbol).await? {
        Some(token) => Ok(token),
        None => {
            tracing::info!("No fan token for {}", symbol);
            Err(AppError::NotFound(format!("No results found for {}.", symbol)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::services::contracts::ContractSet;
    use crate::services::test_support::{
        fan_token, FakeChain, FakeDirectory, FakeIdentity, FakePrices,
    };
    use crate::services::transaction_builder::unlimited_allowance_threshold;
    use ethers::types::{Address, H256, U256};

    const FRAME_URL: &str = "https://frame.test/api/frame";

    fn wei(tokens: u64) -> U256 {
        U256::from(tokens) * U256::exp10(18)
    }

    fn flow_with(chain: FakeChain, directory: FakeDirectory, addresses: Vec<Address>) -> FrameFlow {
        let chain = Arc::new(chain);
        let contracts = ContractSet::from_config(&test_config()).unwrap();
        FrameFlow::new(
            FRAME_URL.to_string(),
            Arc::new(directory),
            Arc::new(FakeIdentity(addresses)),
            RewardCalculator::new(chain.clone(), Arc::new(FakePrices::at(0.5))),
            Arc::new(TransactionBuilder::new(chain, contracts)),
        )
    }

    fn base_directory() -> FakeDirectory {
        FakeDirectory::default().with_token(fan_token("cid:base", "base", 1200))
    }

    fn payload(json: &str) -> FrameActionPayload {
        FrameActionPayload::from_body(json.as_bytes()).unwrap()
    }

    #[test]
    fn home_offers_search() {
        let flow = flow_with(FakeChain::default(), FakeDirectory::default(), vec![]);
        let screen = flow.home();
        assert_eq!(screen.image, "https://frame.test/api/frame/img-home");
        assert_eq!(
            screen.input_placeholder.as_deref(),
            Some("Search for a user or channel")
        );
        assert_eq!(
            screen.buttons,
            vec![FrameButton::post(
                "Search 🔎",
                "https://frame.test/api/frame/search-user-channel"
            )]
        );
    }

    #[tokio::test]
    async fn search_resolves_channel_symbol() {
        let flow = flow_with(FakeChain::default(), base_directory(), vec![]);
        let screen = flow
            .search(&payload(r#"{"untrustedData":{"inputText":"cid:base"}}"#))
            .await
            .unwrap();
        assert_eq!(
            screen.image,
            "https://frame.test/api/frame/img-seach-user-channel/cid%3Abase"
        );
        assert_eq!(screen.buttons[0].label(), "Check amount to reward");
    }

    #[tokio::test]
    async fn search_rejects_untagged_input() {
        let flow = flow_with(FakeChain::default(), base_directory(), vec![]);
        let err = flow
            .search(&payload(r#"{"untrustedData":{"inputText":"base"}}"#))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn search_miss_and_upstream_failure_are_distinct() {
        let flow = flow_with(FakeChain::default(), base_directory(), vec![]);
        let err = flow
            .search(&payload(r#"{"untrustedData":{"inputText":"77"}}"#))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found: No results found for 77.");

        let err = flow
            .search(&payload(r#"{"untrustedData":{"inputText":"cid:nouns"}}"#))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Not found: No results found for cid:nouns.");

        let flow = flow_with(FakeChain::default(), FakeDirectory::offline(), vec![]);
        let err = flow
            .search(&payload(r#"{"untrustedData":{"inputText":"cid:base"}}"#))
            .await
            .unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn check_amount_without_allowance_asks_for_approval() {
        let holder = Address::repeat_byte(1);
        let chain = FakeChain::default().with_balance(holder, wei(10));
        let flow = flow_with(chain, base_directory(), vec![holder]);

        let screen = flow
            .check_amount("cid:base", &FrameActionPayload::default())
            .await
            .unwrap();

        assert_eq!(
            screen.image,
            "https://frame.test/api/frame/img-moxie-amount/10.00/%245.00"
        );
        assert!(screen.input_placeholder.is_none());
        assert_eq!(
            screen.buttons,
            vec![FrameButton::transaction(
                "Approve",
                "https://frame.test/api/frame/approve",
                "https://frame.test/api/frame/check-moxie-amount/cid%3Abase",
            )]
        );
    }

    #[tokio::test]
    async fn check_amount_with_allowance_offers_both_burns() {
        // Dua alamat seri di saldo maksimum, keduanya dijumlahkan
        let a = Address::repeat_byte(1);
        let b = Address::repeat_byte(2);
        let c = Address::repeat_byte(3);
        let chain = FakeChain::default()
            .with_balance(a, wei(5))
            .with_balance(b, wei(9))
            .with_balance(c, wei(9))
            .with_allowance(unlimited_allowance_threshold());
        let flow = flow_with(chain, base_directory(), vec![a, b, c]);

        let screen = flow
            .check_amount("cid:base", &FrameActionPayload::default())
            .await
            .unwrap();

        assert!(screen.image.ends_with("/img-moxie-amount/18.00/%249.00"));
        assert_eq!(
            screen.input_placeholder.as_deref(),
            Some("Amount of MOXIE to reward")
        );
        let subject = format!("{:?}", Address::repeat_byte(0x5a));
        assert_eq!(
            screen.buttons,
            vec![
                FrameButton::transaction(
                    "Reward 100%",
                    format!("{}/buy-n-burn-all/{}", FRAME_URL, subject),
                    format!("{}/share-amount/cid%3Abase", FRAME_URL),
                ),
                FrameButton::transaction(
                    "Reward selected",
                    format!("{}/buy-n-burn-selected/{}", FRAME_URL, subject),
                    format!("{}/share-amount/cid%3Abase", FRAME_URL),
                ),
            ]
        );
    }

    #[tokio::test]
    async fn check_amount_without_addresses_is_zero_and_needs_approval() {
        let chain = FakeChain::default().with_allowance(unlimited_allowance_threshold());
        let flow = flow_with(chain, base_directory(), vec![]);
        let screen = flow
            .check_amount("cid:base", &FrameActionPayload::default())
            .await
            .unwrap();
        assert!(screen.image.ends_with("/img-moxie-amount/0.00/%240.00"));
        assert_eq!(screen.buttons[0].label(), "Approve");
    }

    #[tokio::test]
    async fn share_amount_waits_for_missing_or_unknown_hash() {
        let flow = flow_with(FakeChain::default(), base_directory(), vec![]);

        let screen = flow
            .share_amount("cid:base", &FrameActionPayload::default())
            .await
            .unwrap();
        assert_eq!(screen.aspect_ratio, ASPECT_RATIO_WIDE);
        assert!(screen.state.is_none());

        let hash = format!("{:?}", H256::repeat_byte(0x44));
        let body = format!(r#"{{"untrustedData":{{"transactionId":"{}"}}}}"#, hash);
        let screen = flow.share_amount("cid:base", &payload(&body)).await.unwrap();
        assert_eq!(screen.image, "https://frame.test/api/frame/img-waiting");
        assert_eq!(screen.state.as_deref(), Some(hash.as_str()));
        assert_eq!(
            screen.buttons,
            vec![FrameButton::post(
                "Refresh",
                "https://frame.test/api/frame/share-amount/cid%3Abase"
            )]
        );
    }

    #[tokio::test]
    async fn share_amount_renders_card_after_confirmation() {
        let hash = H256::repeat_byte(0x55);
        let contracts = ContractSet::from_config(&test_config()).unwrap();
        let burn = crate::models::BurnTransaction::new(
            Address::repeat_byte(0x5a),
            U256::from(125u64) * U256::exp10(16),
        );
        let input = contracts.encode_buy_shares_for(&burn).unwrap();
        let flow = flow_with(
            FakeChain::default().with_transaction(hash, input),
            base_directory(),
            vec![],
        );

        // Tombol Refresh membawa hash lewat state
        let body = format!(r#"{{"untrustedData":{{"state":"{:?}"}}}}"#, hash);
        let screen = flow.share_amount("cid:base", &payload(&body)).await.unwrap();

        assert_eq!(
            screen.image,
            "https://frame.test/api/frame/img-share/cid%3Abase/1.25"
        );
        assert_eq!(screen.buttons.len(), 2);
        match &screen.buttons[0] {
            FrameButton::Link { label, href } => {
                assert_eq!(label, "Share");
                assert!(href.starts_with("https://warpcast.com/~/compose?text="));
            }
            other => panic!("expected share link, got {:?}", other),
        }
        assert_eq!(screen.buttons[1], FrameButton::post("Retry", FRAME_URL));
    }

    #[tokio::test]
    async fn share_amount_waits_when_token_lookup_fails_after_decode() {
        let hash = H256::repeat_byte(0x66);
        let contracts = ContractSet::from_config(&test_config()).unwrap();
        let burn = crate::models::BurnTransaction::new(Address::repeat_byte(0x5a), wei(3));
        let input = contracts.encode_buy_shares_for(&burn).unwrap();
        let flow = flow_with(
            FakeChain::default().with_transaction(hash, input),
            FakeDirectory::offline(),
            vec![],
        );

        let body = format!(r#"{{"untrustedData":{{"transactionId":"{:?}"}}}}"#, hash);
        let screen = flow.share_amount("cid:base", &payload(&body)).await.unwrap();

        assert_eq!(screen.image, "https://frame.test/api/frame/img-waiting");
        assert_eq!(screen.state, Some(format!("{:?}", hash)));
        assert_eq!(screen.buttons[0].label(), "Refresh");
    }

    #[tokio::test]
    async fn share_amount_waits_when_deposit_is_too_large_to_display() {
        // Deposit 10^50 melebihi kapasitas Decimal
        let hash = H256::repeat_byte(0x77);
        let contracts = ContractSet::from_config(&test_config()).unwrap();
        let burn =
            crate::models::BurnTransaction::new(Address::repeat_byte(0x5a), U256::exp10(50));
        let input = contracts.encode_buy_shares_for(&burn).unwrap();
        let flow = flow_with(
            FakeChain::default().with_transaction(hash, input),
            base_directory(),
            vec![],
        );

        let body = format!(r#"{{"untrustedData":{{"transactionId":"{:?}"}}}}"#, hash);
        let screen = flow.share_amount("cid:base", &payload(&body)).await.unwrap();

        assert_eq!(screen.aspect_ratio, ASPECT_RATIO_WIDE);
        assert_eq!(screen.state, Some(format!("{:?}", hash)));
    }

    #[tokio::test]
    async fn share_by_user_points_back_home() {
        let flow = flow_with(FakeChain::default(), base_directory(), vec![]);
        let screen = flow.share_by_user("cid:base", "1,250.00").await.unwrap();
        assert_eq!(
            screen.image,
            "https://frame.test/api/frame/img-share/cid%3Abase/1%2C250.00"
        );
        assert_eq!(
            screen.buttons,
            vec![FrameButton::post("Give it a try!", FRAME_URL)]
        );
    }
}
