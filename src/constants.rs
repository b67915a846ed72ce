/// Application constants

// Chain
pub const BASE_CHAIN_ID: u64 = 8453;
pub const DEFAULT_RPC_URL: &str = "https://mainnet.base.org";

// Contract addresses (Base)
pub const DEFAULT_MOXIE_TOKEN_ADDRESS: &str = "0x8C9037D1Ef5c6D1f6816278C7AAF5491d24CD527";
pub const DEFAULT_MOXIE_BONDING_CURVE_ADDRESS: &str = "0x373065e66B32a1C428aa14698dFa99BA7199B55E";

// Token configuration
pub const MOXIE_DECIMALS: u32 = 18;
pub const MOXIE_TICKER: &str = "MOXIES";

// Allowance at or above 10^32 is treated as unlimited
pub const UNLIMITED_ALLOWANCE_EXPONENT: usize = 32;
// Amount granted by the approve transaction: 10^50
pub const UNLIMITED_APPROVAL_EXPONENT: usize = 50;

// External services
pub const DEFAULT_MOXIE_SUBGRAPH_URL: &str =
    "https://api.studio.thegraph.com/query/23537/moxie_protocol_stats_mainnet/version/latest";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_PRICE_COIN_ID: &str = "moxie";
pub const DEFAULT_NEYNAR_API_URL: &str = "https://api.neynar.com";
pub const DEFAULT_AIRSTACK_API_URL: &str = "https://api.airstack.xyz";

// Frame
pub const DEFAULT_PUBLIC_URL: &str = "https://fan-tokens-reward.vercel.app";
pub const DEFAULT_FRAME_BASE_PATH: &str = "/api/frame";
pub const FRAME_TITLE: &str = "Fan Tokens Rewards";
pub const FRAME_VERSION: &str = "vNext";
pub const MAX_FRAME_BUTTONS: usize = 4;
pub const ASPECT_RATIO_SQUARE: &str = "1:1";
pub const ASPECT_RATIO_WIDE: &str = "1.91:1";
pub const NO_STORE_CACHE_CONTROL: &str =
    "no-store, no-cache, must-revalidate, proxy-revalidate max-age=0, s-maxage=0";

// Share
pub const WARPCAST_COMPOSE_URL: &str = "https://warpcast.com/~/compose";
pub const SHARE_MENTIONS: &str = "hihi @betashop.eth @airstack.eth look!";
pub const FRAME_CREDITS: &str = "Frame by @0x94t3z.eth & @thenumb.eth";

// User-facing messages
pub const MSG_INVALID_SEARCH: &str =
    "Invalid input format. Please use `fid:<FID>` or `cid:<Channel Name>`.";
pub const MSG_UPSTREAM_NOT_FOUND: &str = "No results found for the user or channel.";

// API version
pub const API_VERSION: &str = "v1";
