use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use expscope_analysis::{build_report, to_json_pretty, ReportOptions, TestKind};
use expscope_api::{create_router, ApiState};
use expscope_storage::Storage;

use crate::cli::Commands;

pub async fn execute(command: Commands, storage: Storage) -> Result<()> {
    match command {
        Commands::Serve { port } => {
            let state = ApiState {
                storage: Arc::new(storage),
            };
            let app = create_router(state);

            let addr = format!("0.0.0.0:{}", port);
            tracing::info!("expscope API listening on http://{}", addr);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await?;
        }

        Commands::Experiments => {
            for id in storage.experiment_ids().await? {
                println!("{}", id);
            }
        }

        Commands::Results {
            experiment_id,
            output,
        } => {
            let handle = storage.experiment(&experiment_id).await?;
            let table = handle.results().await?;
            let json = serde_json::to_string_pretty(&table.records())?;
            emit(&json, output.as_deref())?;
            tracing::info!(
                "Wrote {} records for experiment {}",
                table.row_count(),
                experiment_id
            );
        }

        Commands::Report {
            experiment_id,
            metric,
            group_col,
            top_n,
            alpha,
            test,
            output,
        } => {
            let test: TestKind = test
                .parse()
                .map_err(|e: String| anyhow!(e))?;

            let handle = storage.experiment(&experiment_id).await?;
            let table = handle.results().await?;

            let options = ReportOptions {
                metric,
                group_col,
                top_n,
                alpha,
                test,
            };
            let report = build_report(&experiment_id, &table, &options)?;
            emit(&to_json_pretty(&report)?, output.as_deref())?;
        }
    }

    Ok(())
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Error writing {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
