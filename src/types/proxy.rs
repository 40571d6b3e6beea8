//! # 代理凭据结构
//!
//! 新版 `users.proxy_settings` 列的结构化形式，序列化后整体写入一列

use serde::{Deserialize, Serialize};

/// VLESS 默认 flow
pub const DEFAULT_VLESS_FLOW: &str = "xtls-rprx-vision";

/// Shadowsocks 固定加密方式
pub const SHADOWSOCKS_METHOD: &str = "chacha20-ietf-poly1305";

/// VLESS 凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlessSettings {
    /// UUID
    pub id: String,
    /// 流控模式
    pub flow: String,
}

/// VMess 凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmessSettings {
    /// UUID
    pub id: String,
}

/// Trojan 凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrojanSettings {
    /// 密码
    pub password: String,
}

/// Shadowsocks 凭据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksSettings {
    /// 加密方式
    pub method: String,
    /// 密码
    pub password: String,
}

/// 四种协议的完整凭据集合
///
/// 四个字段均为必填，结构本身保证新记录总是包含全部协议。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxySettings {
    /// VLESS
    pub vless: VlessSettings,
    /// VMess
    pub vmess: VmessSettings,
    /// Trojan
    pub trojan: TrojanSettings,
    /// Shadowsocks
    pub shadowsocks: ShadowsocksSettings,
}

impl ProxySettings {
    /// 序列化为存储用的 JSON 文本
    pub fn to_blob(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blob_layout() {
        let settings = ProxySettings {
            vless: VlessSettings {
                id: "a".to_string(),
                flow: DEFAULT_VLESS_FLOW.to_string(),
            },
            vmess: VmessSettings { id: "b".to_string() },
            trojan: TrojanSettings {
                password: "c".to_string(),
            },
            shadowsocks: ShadowsocksSettings {
                method: SHADOWSOCKS_METHOD.to_string(),
                password: "d".to_string(),
            },
        };

        assert_eq!(
            settings.to_blob().unwrap(),
            r#"{"vless":{"id":"a","flow":"xtls-rprx-vision"},"vmess":{"id":"b"},"trojan":{"password":"c"},"shadowsocks":{"method":"chacha20-ietf-poly1305","password":"d"}}"#
        );
    }
}
