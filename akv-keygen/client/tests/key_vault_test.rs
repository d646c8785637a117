mod common;

use std::sync::Arc;

use akv_keygen_client::{AzureCli, CommandOutput, ErrorKind, KeyVaultClient, SecretStore};
use akv_keygen_core::model::{Expiration, SecretAttributes, SecretValue, Tags};
use chrono::NaiveDate;

use crate::common::{service_unavailable, ScriptedRunner};

const SUBSCRIPTION_ID: &str = "2f3e4d5c-6b7a-4980-a1b2-c3d4e5f6a7b8";
const SECRET_ID: &str = "https://my-vault.vault.azure.net/secrets/secret--encryption--symmetricKey/0d9a5e7f1c2b4a3e8f6d5c4b3a291807";

fn client(outputs: Vec<CommandOutput>) -> (KeyVaultClient<Arc<ScriptedRunner>>, Arc<ScriptedRunner>) {
    let runner = ScriptedRunner::new(outputs);
    (KeyVaultClient::new(AzureCli::new(runner.clone())), runner)
}

fn default_account(id: &str) -> CommandOutput {
    CommandOutput::success(format!(r#"[{{"id": "{id}", "isDefault": true, "name": "dev"}}]"#))
}

#[tokio::test]
async fn test_select_account_already_active() {
    let (store, runner) = client(vec![default_account(&SUBSCRIPTION_ID.to_uppercase())]);

    store.select_account(SUBSCRIPTION_ID).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][..4], ["account", "list", "--query", "[?isDefault]"]);
}

#[tokio::test]
async fn test_select_account_switches_subscription() {
    let (store, runner) = client(vec![
        default_account("00000000-0000-0000-0000-000000000000"),
        CommandOutput::success(""),
    ]);

    store.select_account(SUBSCRIPTION_ID).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1][..4], ["account", "set", "--subscription", SUBSCRIPTION_ID]);
}

#[tokio::test]
async fn test_select_account_without_default_is_access_denied() {
    for output in [CommandOutput::success("[]"), CommandOutput::success("")] {
        let (store, _) = client(vec![output]);

        let err = store.select_account(SUBSCRIPTION_ID).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::AccessDenied);
        assert!(err.to_string().contains(SUBSCRIPTION_ID));
    }
}

#[tokio::test]
async fn test_select_account_malformed_response() {
    let (store, _) = client(vec![CommandOutput::success(r#"[{"name": "dev"}]"#)]);

    let err = store.select_account(SUBSCRIPTION_ID).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
}

#[tokio::test]
async fn test_resource_group_exists() {
    let (store, runner) = client(vec![CommandOutput::success(r#"{"name": "rg"}"#)]);

    assert!(store.resource_group_exists("rg").await.unwrap());
    assert_eq!(runner.calls()[0][..4], ["group", "show", "--name", "rg"]);
}

#[tokio::test]
async fn test_missing_resource_group_is_false() {
    let (store, _) = client(vec![CommandOutput::failure(3, "ERROR: (ResourceGroupNotFound)")]);

    assert!(!store.resource_group_exists("rg").await.unwrap());
}

#[tokio::test]
async fn test_vault_lookup_propagates_other_failures() {
    let (store, _) = client(vec![CommandOutput::failure(1, "ERROR: (AuthorizationFailed)")]);

    let err = store.vault_exists("rg", "my-vault").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExecutionFailure);
}

#[tokio::test(start_paused = true)]
async fn test_vault_lookup_retries_outage() {
    let (store, runner) = client(vec![
        service_unavailable(),
        CommandOutput::failure(3, "ERROR: (ResourceNotFound)"),
    ]);

    assert!(!store.vault_exists("rg", "my-vault").await.unwrap());

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1][..6], ["keyvault", "show", "--name", "my-vault", "--resource-group", "rg"]);
}

#[tokio::test]
async fn test_set_secret_returns_identifier() {
    let (store, runner) = client(vec![CommandOutput::success(format!(r#"["{SECRET_ID}"]"#))]);
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
    let secret = SecretAttributes::new("secret--encryption--symmetricKey", SecretValue::new("ab12"))
        .with_expiration(Some(Expiration::parse("2024-09-13", today).unwrap()))
        .with_tags("user=alice,team=ops".parse::<Tags>().unwrap());

    let id = store.set_secret("my-vault", &secret).await.unwrap();

    assert_eq!(id.version(), "0d9a5e7f1c2b4a3e8f6d5c4b3a291807");
    let mut args = runner.calls().remove(0);
    assert_eq!(args[9], "--file");
    let value_path = std::mem::take(&mut args[10]);
    assert_eq!(
        args,
        [
            "keyvault",
            "secret",
            "set",
            "--query",
            "[id]",
            "--vault-name",
            "my-vault",
            "--name",
            "secret--encryption--symmetricKey",
            "--file",
            "",
            "--encoding",
            "utf-8",
            "--content-type",
            "application/octet-stream",
            "--expires",
            "2024-09-13",
            "--tags",
            "user=alice",
            "--tags",
            "team=ops",
            "--output",
            "json",
            "--only-show-errors",
        ]
    );
    assert!(!value_path.is_empty());
    assert_eq!(runner.file_contents(), ["ab12"]);
}

#[tokio::test]
async fn test_set_secret_without_optional_attributes() {
    let (store, runner) = client(vec![CommandOutput::success(format!(r#"["{SECRET_ID}"]"#))]);
    let secret = SecretAttributes::new("name", SecretValue::new("ab12"));

    let _ = store.set_secret("my-vault", &secret).await.unwrap();

    let args = &runner.calls()[0];
    assert!(!args.contains(&"--expires".to_string()));
    assert!(!args.contains(&"--tags".to_string()));
}

#[tokio::test]
async fn test_set_secret_unexpected_response() {
    for stdout in ["", r#"{"id": "x"}"#, "[]", r#"["not-a-secret-id"]"#] {
        let (store, _) = client(vec![CommandOutput::success(stdout)]);
        let secret = SecretAttributes::new("name", SecretValue::new("ab12"));

        let err = store.set_secret("my-vault", &secret).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ExecutionFailure, "{stdout:?}");
    }
}

#[tokio::test]
async fn test_set_secret_keeps_value_out_of_arguments() {
    let (store, runner) = client(vec![CommandOutput::success(format!(r#"["{SECRET_ID}"]"#))]);
    let secret = SecretAttributes::new("name", SecretValue::new("c0ffee00deadbeef"));

    let _ = store.set_secret("my-vault", &secret).await.unwrap();

    let args = &runner.calls()[0];
    assert!(args.iter().all(|arg| !arg.contains("c0ffee00deadbeef")), "{args:?}");
    assert_eq!(runner.file_contents(), ["c0ffee00deadbeef"]);

    let value_path = &args[args.iter().position(|arg| arg == "--file").unwrap() + 1];
    assert!(!std::path::Path::new(value_path).exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_set_secret_value_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    struct ModeRunner(std::sync::Mutex<Option<u32>>);

    #[async_trait::async_trait]
    impl akv_keygen_client::CommandRunner for ModeRunner {
        fn program(&self) -> &std::path::Path { std::path::Path::new("az") }

        async fn run(&self, args: &[String]) -> std::io::Result<CommandOutput> {
            let path = args.iter().skip_while(|arg| *arg != "--file").nth(1).unwrap();
            let mode = std::fs::metadata(path)?.permissions().mode();
            *self.0.lock().unwrap() = Some(mode & 0o777);
            Ok(CommandOutput::success(format!(r#"["{SECRET_ID}"]"#)))
        }
    }

    let runner = Arc::new(ModeRunner(std::sync::Mutex::default()));
    let store = KeyVaultClient::new(AzureCli::new(runner.clone()));

    let _ = store
        .set_secret("my-vault", &SecretAttributes::new("name", SecretValue::new("ab12")))
        .await
        .unwrap();

    assert_eq!(*runner.0.lock().unwrap(), Some(0o600));
}
