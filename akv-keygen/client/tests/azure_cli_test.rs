mod common;

use std::{io, time::Duration};

use akv_keygen_client::{AzureCli, CommandOutput, ErrorKind, RetryPolicy};
use serde_json::json;
use tokio::time::Instant;

use crate::common::{service_unavailable, ScriptedRunner};

#[tokio::test]
async fn test_forces_json_output() {
    let runner = ScriptedRunner::new([CommandOutput::success(r#"{"name": "rg"}"#)]);
    let az = AzureCli::new(runner.clone());

    let response = az.invoke(&["group", "show", "--name", "rg"], &[]).await.unwrap();

    assert_eq!(response, Some(json!({"name": "rg"})));
    assert_eq!(
        runner.calls(),
        [["group", "show", "--name", "rg", "--output", "json", "--only-show-errors"]]
    );
}

#[tokio::test]
async fn test_empty_output_is_empty_result() {
    let runner = ScriptedRunner::new([CommandOutput::success("  \n")]);
    let az = AzureCli::new(runner);

    assert_eq!(az.invoke(&["account", "set", "--subscription", "x"], &[]).await.unwrap(), None);
}

#[tokio::test]
async fn test_not_found_exit_code() {
    let runner = ScriptedRunner::new([CommandOutput::failure(
        3,
        "ERROR: Resource group 'rg' could not be found.",
    )]);
    let az = AzureCli::new(runner.clone());

    let err = az.invoke(&["group", "show", "--name", "rg"], &[]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_configured_not_found_exit_code() {
    let runner = ScriptedRunner::new([CommandOutput::failure(3, "ERROR: boom")]);
    let az = AzureCli::new(runner).with_not_found_exit_code(4);

    let err = az.invoke(&["group", "show"], &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
}

#[tokio::test]
async fn test_other_exit_codes_are_execution_failures() {
    for exit_code in [1, 2, 127] {
        let runner = ScriptedRunner::new([CommandOutput::failure(exit_code, "ERROR: bad")]);
        let az = AzureCli::new(runner.clone());

        let err = az.invoke(&["keyvault", "show"], &[]).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExecutionFailure, "exit code {exit_code}");
        assert!(err.to_string().contains(&format!("exit code: {exit_code}")));
        assert_eq!(runner.call_count(), 1, "exit code {exit_code} must not be retried");
    }
}

#[tokio::test]
async fn test_signal_termination_is_execution_failure() {
    let runner = ScriptedRunner::new([CommandOutput { exit_code: None, ..Default::default() }]);
    let az = AzureCli::new(runner);

    let err = az.invoke(&["keyvault", "show"], &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
}

#[tokio::test]
async fn test_spawn_failure_is_execution_failure() {
    let runner = ScriptedRunner::failing(io::ErrorKind::NotFound);
    let az = AzureCli::new(runner);

    let err = az.invoke(&["account", "list"], &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
}

#[tokio::test]
async fn test_undecodable_output_is_execution_failure() {
    let runner = ScriptedRunner::new([CommandOutput::success("Name    Location\nrg      westus")]);
    let az = AzureCli::new(runner);

    let err = az.invoke(&["group", "show", "--name", "rg"], &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
}

#[tokio::test]
async fn test_error_text_without_output_is_execution_failure() {
    let runner = ScriptedRunner::new([CommandOutput {
        exit_code: Some(0),
        stdout: String::new(),
        stderr: "ERROR: something went wrong".to_string(),
    }]);
    let az = AzureCli::new(runner);

    let err = az.invoke(&["group", "show", "--name", "rg"], &[]).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
    assert!(err.to_string().contains("something went wrong"));
}

#[tokio::test]
async fn test_connection_error_on_other_host_is_not_retried() {
    let runner = ScriptedRunner::new([CommandOutput::failure(
        1,
        "ERROR: HTTPSConnectionPool(host='my-vault.vault.azure.net', port=443): Max retries \
         exceeded with url: /secrets",
    )]);
    let az = AzureCli::new(runner.clone());

    let err = az.invoke(&["keyvault", "secret", "set"], &[]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_service_unavailable_is_retried_until_success() {
    let runner = ScriptedRunner::new([
        service_unavailable(),
        service_unavailable(),
        CommandOutput::success("[]"),
    ]);
    let az = AzureCli::new(runner.clone());
    let started = Instant::now();

    let response = az.invoke(&["account", "list"], &[]).await.unwrap();

    assert_eq!(response, Some(json!([])));
    assert_eq!(runner.call_count(), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_service_unavailable_gives_up_after_five_attempts() {
    let runner = ScriptedRunner::new(std::iter::repeat_with(service_unavailable).take(5));
    let az = AzureCli::new(runner.clone());
    let started = Instant::now();

    let err = az.invoke(&["account", "list"], &[]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(runner.call_count(), 5);
    assert_eq!(started.elapsed(), Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn test_custom_retry_policy() {
    let runner = ScriptedRunner::new(std::iter::repeat_with(service_unavailable).take(2));
    let az = AzureCli::new(runner.clone())
        .with_retry_policy(RetryPolicy { max_attempts: 2, delay: Duration::from_millis(250) });
    let started = Instant::now();

    let err = az.invoke(&["account", "list"], &[]).await.unwrap_err();

    assert!(err.is_transient());
    assert_eq!(runner.call_count(), 2);
    assert_eq!(started.elapsed(), Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn test_zero_attempts_still_runs_once() {
    let runner = ScriptedRunner::new([service_unavailable()]);
    let az = AzureCli::new(runner.clone())
        .with_retry_policy(RetryPolicy { max_attempts: 0, delay: Duration::from_secs(5) });

    let err = az.invoke(&["account", "list"], &[]).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert_eq!(runner.call_count(), 1);
}

#[tokio::test]
async fn test_redacted_values_never_reach_errors() {
    let runner = ScriptedRunner::new([CommandOutput::failure(
        2,
        "ERROR: invalid value 'c0ffee' for --value",
    )]);
    let az = AzureCli::new(runner.clone());

    let err = az
        .invoke(&["keyvault", "secret", "set", "--value", "c0ffee"], &["c0ffee"])
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(!message.contains("c0ffee"), "{message}");
    assert!(message.contains("--value *****"), "{message}");
    // the real value is still handed to the tool
    assert!(runner.calls()[0].contains(&"c0ffee".to_string()));
}
