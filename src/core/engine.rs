use crate::core::{Pipeline, Result};
use crate::utils::monitor::SystemMonitor;

pub struct CheckEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> CheckEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting offer check...");

        tracing::info!("Fetching connections and offers...");
        let routes = self.pipeline.extract().await?;
        let connection_count: usize = routes.iter().map(|r| r.connections.len()).sum();
        tracing::info!(
            "Checked {} route(s), found {} connection(s)",
            routes.len(),
            connection_count
        );
        self.monitor.log_stats("extract");

        tracing::info!("Rendering report...");
        let bundle = self.pipeline.transform(routes).await?;
        self.monitor.log_stats("transform");

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(bundle).await?;
        self.monitor.log_stats("load");

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ReportBundle;
    use crate::domain::ports::Pipeline;
    use crate::utils::error::CheckError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubPipeline {
        fail_extract: bool,
        stages_run: AtomicUsize,
    }

    impl StubPipeline {
        fn new(fail_extract: bool) -> Self {
            Self {
                fail_extract,
                stages_run: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<crate::core::RouteOffers>> {
            self.stages_run.fetch_add(1, Ordering::SeqCst);
            if self.fail_extract {
                return Err(CheckError::ProcessingError {
                    message: "extract failed".to_string(),
                });
            }
            Ok(Vec::new())
        }

        async fn transform(
            &self,
            data: Vec<crate::core::RouteOffers>,
        ) -> Result<ReportBundle> {
            self.stages_run.fetch_add(1, Ordering::SeqCst);
            Ok(ReportBundle {
                routes: data,
                html_output: String::new(),
                text_output: String::new(),
            })
        }

        async fn load(&self, _result: ReportBundle) -> Result<String> {
            self.stages_run.fetch_add(1, Ordering::SeqCst);
            Ok("docs/index.html".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_drives_all_stages() {
        let engine = CheckEngine::new(StubPipeline::new(false));
        let output_path = engine.run().await.unwrap();

        assert_eq!(output_path, "docs/index.html");
        assert_eq!(engine.pipeline.stages_run.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_stops_after_failed_extract() {
        let engine = CheckEngine::new(StubPipeline::new(true));
        let result = engine.run().await;

        assert!(result.is_err());
        assert_eq!(engine.pipeline.stages_run.load(Ordering::SeqCst), 1);
    }
}
