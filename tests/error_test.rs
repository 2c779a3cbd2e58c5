use swagger_sync::{Result, SyncError};

#[test]
fn test_spec_format_error() {
    let err = SyncError::SpecFormat("missing `paths`".to_string());
    assert_eq!(err.to_string(), "OpenAPI 文档格式错误: missing `paths`");
}

#[test]
fn test_config_error() {
    let err = SyncError::Config("invalid base URL".to_string());
    assert_eq!(err.to_string(), "配置错误: invalid base URL");
    assert!(!err.is_connection_refused());
}

#[test]
fn test_publish_error_display() {
    let err = SyncError::Publish {
        status: Some(401),
        message: "Invalid API Key".to_string(),
    };
    assert_eq!(err.to_string(), "Postman API 错误 (401): Invalid API Key");

    let err = SyncError::Publish {
        status: None,
        message: "connection reset".to_string(),
    };
    assert_eq!(err.to_string(), "Postman API 错误: connection reset");
}

#[test]
fn test_error_conversion_from_anyhow() {
    let anyhow_err = anyhow::anyhow!("test anyhow error");
    let sync_err: SyncError = anyhow_err.into();
    assert!(sync_err.to_string().contains("test anyhow error"));
}

#[test]
fn test_result_type() {
    fn returns_error() -> Result<()> {
        Err(SyncError::SpecFormat("test".to_string()))
    }

    match returns_error() {
        Err(SyncError::SpecFormat(msg)) => assert_eq!(msg, "test"),
        _ => panic!("Expected SpecFormat"),
    }
}
