use thiserror::Error;

#[derive(Debug, Error)]
pub enum GiftError {
    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("API请求失败: {0}")]
    Request(String),

    #[error("API返回格式异常: {0}")]
    ResponseFormat(String),

    #[error("收礼人信息无效: {0}")]
    InvalidProfile(String),

    #[error("尚未提交收礼人信息")]
    NoProfile,

    #[error("读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置文件格式错误: {0}")]
    Settings(#[from] serde_yaml::Error),
}

impl GiftError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    pub fn response_format(msg: impl Into<String>) -> Self {
        Self::ResponseFormat(msg.into())
    }

    pub fn invalid_profile(msg: impl Into<String>) -> Self {
        Self::InvalidProfile(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request(_))
    }

    pub fn is_response_format(&self) -> bool {
        matches!(self, Self::ResponseFormat(_))
    }
}

pub type Result<T> = std::result::Result<T, GiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_share_one_register() {
        assert_eq!(
            GiftError::configuration("请先配置API Key").to_string(),
            "配置错误: 请先配置API Key"
        );
        assert_eq!(
            GiftError::request("401 Unauthorized").to_string(),
            "API请求失败: 401 Unauthorized"
        );
        assert_eq!(GiftError::NoProfile.to_string(), "尚未提交收礼人信息");
        assert!(GiftError::invalid_profile("x").to_string().starts_with("收礼人信息无效"));
    }
}
