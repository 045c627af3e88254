//! # 静态地图下载
//!
//! ## 实现思路
//!
//! 1. `static_map_url` 只做 URL 组装（可单测，不触网）
//! 2. `MapClient::fetch` 发起请求 → 校验状态码 → 按块读取并限制大小
//! 3. 读取完成后用 `infer` 嗅探签名，确认响应确实是图片

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::Url;

use super::{MapConfig, MapError};

/// 组装静态地图请求地址：中心点与标记点均为 `(lat, lon)`。
pub fn static_map_url(config: &MapConfig, lat: f64, lon: f64) -> Result<Url, MapError> {
    if !config.has_api_key() {
        return Err(MapError::MissingApiKey);
    }

    let mut url = Url::parse(&config.base_url)
        .map_err(|e| MapError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

    let center = format!("lonlat:{},{}", lon, lat);
    let marker = format!(
        "{};type:awesome;color:{};size:medium",
        center, config.marker_color
    );

    url.query_pairs_mut()
        .append_pair("style", &config.style)
        .append_pair("width", &config.width.to_string())
        .append_pair("height", &config.height.to_string())
        .append_pair("center", &center)
        .append_pair("zoom", &config.zoom.to_string())
        .append_pair("marker", &marker)
        .append_pair("apiKey", config.api_key.trim());

    Ok(url)
}

/// 静态地图客户端，内部持有可复用的 `reqwest::Client`。
pub struct MapClient {
    config: MapConfig,
    http_client: reqwest::Client,
}

impl MapClient {
    pub fn new(config: MapConfig) -> Result<Self, MapError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MapError::Network(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// 下载 `(lat, lon)` 处的静态地图图片。
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<Bytes, MapError> {
        let url = static_map_url(&self.config, lat, lon)?;
        let start = Instant::now();

        log::info!("🗺️ 请求静态地图 - 坐标: {:.6}, {:.6}", lat, lon);

        let mut response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("⚠️ 地图服务返回 HTTP {}", status.as_u16());
            return Err(MapError::Status(status.as_u16()));
        }

        let limit = self.config.max_response_bytes;
        let mut buffer = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| self.map_reqwest_error(e))?
        {
            if buffer.len() as u64 + chunk.len() as u64 > limit {
                return Err(MapError::InvalidResponse(format!(
                    "response exceeds size limit ({} bytes)",
                    limit
                )));
            }
            buffer.extend_from_slice(&chunk);
        }

        Self::validate_image_body(&buffer)?;

        log::info!(
            "✅ 静态地图下载完成 - {} bytes total={}ms",
            buffer.len(),
            start.elapsed().as_millis()
        );

        Ok(Bytes::from(buffer))
    }

    fn validate_image_body(body: &[u8]) -> Result<(), MapError> {
        match infer::get(body) {
            Some(kind) if kind.matcher_type() == infer::MatcherType::Image => Ok(()),
            Some(kind) => Err(MapError::InvalidResponse(kind.mime_type().to_string())),
            None => Err(MapError::InvalidResponse(format!(
                "unrecognized response body ({} bytes)",
                body.len()
            ))),
        }
    }

    // 错误信息中可能带有含 apiKey 的完整 URL，统一去掉
    fn map_reqwest_error(&self, e: reqwest::Error) -> MapError {
        let e = e.without_url();
        if e.is_timeout() {
            MapError::Network(format!("request timed out ({}s)", self.config.timeout_secs))
        } else if e.is_connect() {
            MapError::Network(format!("cannot connect: {}", e))
        } else {
            MapError::Network(format!("request failed: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> MapConfig {
        MapConfig {
            api_key: "test-key".to_string(),
            ..MapConfig::default()
        }
    }

    fn query(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[test]
    fn missing_key_is_rejected_before_any_request() {
        let result = static_map_url(&MapConfig::default(), 1.0, 2.0);
        assert!(matches!(result, Err(MapError::MissingApiKey)));
    }

    #[test]
    fn url_places_longitude_first() {
        let url = static_map_url(&config_with_key(), 40.5, -73.25).unwrap();

        assert_eq!(url.host_str(), Some("maps.geoapify.com"));
        assert_eq!(query(&url, "center").as_deref(), Some("lonlat:-73.25,40.5"));
        assert_eq!(query(&url, "zoom").as_deref(), Some("10"));
        assert_eq!(query(&url, "apiKey").as_deref(), Some("test-key"));
        assert_eq!(
            query(&url, "marker").as_deref(),
            Some("lonlat:-73.25,40.5;type:awesome;color:#ff0000;size:medium")
        );
        // 颜色中的 # 必须编码，否则会被当成片段
        assert!(url.as_str().contains("%23ff0000"));
        assert!(url.fragment().is_none());
    }

    #[test]
    fn invalid_base_url_is_reported() {
        let config = MapConfig {
            base_url: "not a url".to_string(),
            ..config_with_key()
        };
        assert!(matches!(
            static_map_url(&config, 0.0, 0.0),
            Err(MapError::InvalidUrl(_))
        ));
    }

    #[test]
    fn body_must_be_an_image() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert!(MapClient::validate_image_body(&png).is_ok());
        assert!(matches!(
            MapClient::validate_image_body(b"{\"error\":\"Unauthorized\"}"),
            Err(MapError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn fetch_without_key_fails_fast() {
        let client = MapClient::new(MapConfig::default()).unwrap();
        assert!(matches!(
            client.fetch(0.0, 0.0).await,
            Err(MapError::MissingApiKey)
        ));
    }
}
