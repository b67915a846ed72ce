pub mod frames;
pub mod health;
pub mod images;
pub mod transactions;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::integrations::{
    http_client, AirstackClient, CoinGeckoClient, MoxieSubgraphClient, NeynarClient,
    ProfileImageSource, TokenDirectory,
};
use crate::services::{
    contracts::ContractSet, onchain::EvmChainReader, FrameFlow, RewardCalculator,
    TransactionBuilder,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub flow: Arc<FrameFlow>,
    pub transactions: Arc<TransactionBuilder>,
    pub directory: Arc<dyn TokenDirectory>,
    pub profile_images: Arc<dyn ProfileImageSource>,
}

impl AppState {
    /// Wires every collaborator once; handlers only clone the `Arc`s.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = http_client(config.http_timeout_secs)?;
        let chain = Arc::new(EvmChainReader::from_config(&config)?);
        let contracts = ContractSet::from_config(&config)?;

        let directory: Arc<dyn TokenDirectory> =
            Arc::new(MoxieSubgraphClient::new(client.clone(), &config));
        let prices = Arc::new(CoinGeckoClient::new(client.clone(), &config));
        let identity = Arc::new(NeynarClient::new(client.clone(), &config));
        let profile_images: Arc<dyn ProfileImageSource> =
            Arc::new(AirstackClient::new(client, &config));

        let transactions = Arc::new(TransactionBuilder::new(chain.clone(), contracts));
        let flow = Arc::new(FrameFlow::new(
            config.frame_url(),
            directory.clone(),
            identity,
            RewardCalculator::new(chain, prices),
            transactions.clone(),
        ));

        Ok(Self {
            config,
            flow,
            transactions,
            directory,
            profile_images,
        })
    }
}
