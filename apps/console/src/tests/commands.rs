use crate::cli::ListArgs;
use crate::commands::{format_instance, list_params};
use crate::error::ConsoleError;

use models::{ComputeInstance, InstanceStatus};

fn args(page: u32) -> ListArgs {
    ListArgs {
        page,
        page_size: 20,
        keyword: Some("web".to_string()),
        status: None,
        region: Some("cn-north-1".to_string()),
    }
}

#[test]
fn given_list_args_when_converted_then_params_carry_filters() {
    let params = list_params(args(2)).unwrap();

    assert_eq!(params.pagination.current, 2);
    assert_eq!(params.pagination.page_size, 20);
    assert_eq!(params.pagination.keyword.as_deref(), Some("web"));
    assert_eq!(params.region.as_deref(), Some("cn-north-1"));
}

/// **VALUE**: Page zero is rejected locally instead of being sent to the server.
#[test]
fn given_page_zero_when_converted_then_config_error() {
    assert!(matches!(list_params(args(0)), Err(ConsoleError::Config { .. })));
}

#[test]
fn given_instance_when_formatted_then_status_lowercase() {
    let instance = ComputeInstance {
        id: "i-1".to_string(),
        name: "web-1".to_string(),
        status: InstanceStatus::Running,
        cpu: 2,
        memory: 4,
        disk: 40,
        ip: "10.0.0.1".to_string(),
        create_time: "2024-01-01".to_string(),
        region: "cn-north-1".to_string(),
    };

    let line = format_instance(&instance);

    assert!(line.contains("running"));
    assert!(line.contains("2C/4G/40G"));
}
