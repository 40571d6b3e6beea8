//! # 凭据生成
//!
//! 为需要新凭据的协议生成随机密钥，并从旧版 VLESS settings 中提取 id / flow。
//! 随机数一律取自操作系统 CSPRNG。

use rand::{Rng, rngs::OsRng};
use serde_json::Value;
use uuid::Uuid;

use crate::types::{
    DEFAULT_VLESS_FLOW, ProxySettings, SHADOWSOCKS_METHOD, ShadowsocksSettings, TrojanSettings,
    VlessSettings, VmessSettings,
};

/// 密钥字母表（64 个字符）
const SECRET_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Trojan / Shadowsocks 密码默认长度
pub const DEFAULT_SECRET_LENGTH: usize = 32;

/// 生成指定长度的随机密钥
#[must_use]
pub fn random_secret(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| char::from(SECRET_ALPHABET[rng.gen_range(0..SECRET_ALPHABET.len())]))
        .collect()
}

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// 从旧版 settings 中提取 VLESS 凭据
///
/// 解析失败、不是 JSON 对象或字段缺失时，对应字段分别回退到新 UUID 与默认 flow。
#[must_use]
pub fn derive_vless_settings(raw_blob: Option<&str>) -> VlessSettings {
    let parsed = raw_blob
        .and_then(|blob| serde_json::from_str::<Value>(blob).ok())
        .filter(Value::is_object);

    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|settings| settings.get(name))
            .and_then(Value::as_str)
            .map(str::to_string)
    };

    VlessSettings {
        id: field("id").unwrap_or_else(new_uuid),
        flow: field("flow").unwrap_or_else(|| DEFAULT_VLESS_FLOW.to_string()),
    }
}

/// 组装四种协议的完整凭据
#[must_use]
pub fn synthesize_proxy_settings(raw_blob: Option<&str>) -> ProxySettings {
    ProxySettings {
        vless: derive_vless_settings(raw_blob),
        vmess: VmessSettings { id: new_uuid() },
        trojan: TrojanSettings {
            password: random_secret(DEFAULT_SECRET_LENGTH),
        },
        shadowsocks: ShadowsocksSettings {
            method: SHADOWSOCKS_METHOD.to_string(),
            password: random_secret(DEFAULT_SECRET_LENGTH),
        },
    }
}
