use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{graphql::GraphQlClient, ProfileImageSource};
use crate::{config::Config, models::TokenQuery};

const CHANNEL_IMAGE_QUERY: &str = r#"
query SearchChannelImageByCid($channelId: String) {
  FarcasterChannels(
    input: { blockchain: ALL, filter: { channelId: { _eq: $channelId } } }
  ) {
    FarcasterChannel {
      imageUrl
    }
  }
}
"#;

const USER_IMAGE_QUERY: &str = r#"
query SearchUserImageByFid($userId: String) {
  Socials(
    input: { filter: { dappName: { _eq: farcaster }, userId: { _eq: $userId } }, blockchain: ethereum }
  ) {
    Social {
      profileImage
    }
  }
}
"#;

/// Airstack GraphQL lookups for channel and user avatars.
#[derive(Debug, Clone)]
pub struct AirstackClient {
    graph: Option<GraphQlClient>,
}

#[derive(Debug, Deserialize)]
struct ChannelImageData {
    #[serde(rename = "FarcasterChannels")]
    channels: Option<ChannelList>,
}

#[derive(Debug, Deserialize)]
struct ChannelList {
    #[serde(rename = "FarcasterChannel", default)]
    items: Option<Vec<ChannelImage>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelImage {
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserImageData {
    #[serde(rename = "Socials")]
    socials: Option<SocialList>,
}

#[derive(Debug, Deserialize)]
struct SocialList {
    #[serde(rename = "Social", default)]
    items: Option<Vec<SocialImage>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SocialImage {
    profile_image: Option<String>,
}

impl AirstackClient {
    /// Without an API key every lookup resolves to no image.
    pub fn new(client: Client, config: &Config) -> Self {
        let graph = config.airstack_api_key.as_ref().map(|key| {
            let endpoint = format!("{}/gql", config.airstack_api_url.trim().trim_end_matches('/'));
            GraphQlClient::new(client, endpoint, "Airstack").with_auth_header("authorization", key.clone())
        });
        Self { graph }
    }
}

#[async_trait]
impl ProfileImageSource for AirstackClient {
    async fn profile_image(&self, query: &TokenQuery) -> Option<String> {
        let graph = self.graph.as_ref()?;

        let image = match query {
            TokenQuery::Channel(channel_id) => graph
                .query::<ChannelImageData>(CHANNEL_IMAGE_QUERY, json!({ "channelId": channel_id }))
                .await
                .map(channel_image_url),
            TokenQuery::Fan(user_id) => graph
                .query::<UserImageData>(USER_IMAGE_QUERY, json!({ "userId": user_id }))
                .await
                .map(user_image_url),
        };

        match image {
            Ok(Some(url)) => {
                tracing::debug!("Profile image for {}: {}", query, url);
                Some(url)
            }
            Ok(None) => {
                tracing::info!("No image found for {}", query);
                None
            }
            Err(err) => {
                tracing::warn!("Profile image lookup for {} failed: {}", query, err);
                None
            }
        }
    }
}

fn channel_image_url(data: ChannelImageData) -> Option<String> {
    data.channels?
        .items?
        .into_iter()
        .find_map(|item| item.image_url.filter(|url| !url.trim().is_empty()))
}

fn user_image_url(data: UserImageData) -> Option<String> {
    data.socials?
        .items?
        .into_iter()
        .find_map(|item| item.profile_image.filter(|url| !url.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn channel_image_is_first_non_empty_url() {
        let data: ChannelImageData = serde_json::from_str(
            r#"{"FarcasterChannels":{"FarcasterChannel":[{"imageUrl":""},{"imageUrl":"https://img/base.png"}]}}"#,
        )
        .unwrap();
        assert_eq!(channel_image_url(data).as_deref(), Some("https://img/base.png"));
    }

    #[test]
    fn missing_socials_yield_none() {
        let data: UserImageData =
            serde_json::from_str(r#"{"Socials":{"Social":null}}"#).unwrap();
        assert!(user_image_url(data).is_none());
    }

    #[tokio::test]
    async fn no_api_key_means_no_lookup() {
        let client = AirstackClient::new(Client::new(), &test_config());
        let image = client.profile_image(&TokenQuery::Fan("3".into())).await;
        assert!(image.is_none());
    }
}
