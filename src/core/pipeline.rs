use crate::core::client::NightjetClient;
use crate::core::report;
use crate::core::{ConfigProvider, Pipeline, ReportBundle, RouteOffers, Storage};
use crate::domain::model::{ConnectionOffers, ReportFormat, Station};
use crate::utils::error::Result;
use std::collections::HashMap;

pub struct OfferPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> OfferPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OfferPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RouteOffers>> {
        let client = NightjetClient::connect(self.config.api_endpoint()).await?;

        // Resolve each distinct station name once; outward and return queries
        // share their endpoints.
        let mut stations: HashMap<String, Station> = HashMap::new();
        for query in self.config.routes() {
            for name in [&query.origin, &query.destination] {
                if !stations.contains_key(name.as_str()) {
                    let station = client.find_station(name).await?;
                    tracing::info!("Resolved '{}' to {}", name, station);
                    stations.insert(name.clone(), station);
                }
            }
        }

        let mut routes = Vec::new();
        for query in self.config.routes() {
            let from = stations[&query.origin].clone();
            let to = stations[&query.destination].clone();
            tracing::info!("Checking {} -> {} up from {}", from, to, query.date);

            let mut connections: Vec<ConnectionOffers> = Vec::new();
            let mut exhausted = false;
            while connections.len() < query.count {
                let page = client
                    .connections(&from, &to, query.date, connections.len())
                    .await?;
                if page.is_empty() {
                    tracing::warn!(
                        "No matching connections for {} -> {} beyond {} result(s)",
                        from,
                        to,
                        connections.len()
                    );
                    exhausted = true;
                    break;
                }

                for connection in page {
                    if connections.len() >= query.count {
                        break;
                    }
                    let offers = client
                        .offers(&connection, self.config.travelers())
                        .await?;
                    tracing::debug!("{} offer(s) for {}", offers.len(), connection);
                    connections.push(ConnectionOffers { connection, offers });
                }
            }

            routes.push(RouteOffers {
                query: query.clone(),
                from,
                to,
                connections,
                exhausted,
            });
        }

        Ok(routes)
    }

    async fn transform(&self, data: Vec<RouteOffers>) -> Result<ReportBundle> {
        let created = chrono::Local::now().date_naive();
        let html_output = report::render_html(created, &data);
        let text_output = report::render_text(created, &data);

        Ok(ReportBundle {
            routes: data,
            html_output,
            text_output,
        })
    }

    async fn load(&self, result: ReportBundle) -> Result<String> {
        let (file_name, output) = match self.config.format() {
            ReportFormat::Html => ("index.html", &result.html_output),
            ReportFormat::Text => ("index.txt", &result.text_output),
        };

        match self.config.output_path() {
            Some(base) => {
                tracing::debug!("Writing {} ({} bytes)", file_name, output.len());
                self.storage.write_file(file_name, output.as_bytes()).await?;
                Ok(format!("{}/{}", base.trim_end_matches('/'), file_name))
            }
            None => {
                // stdout carries the report so the CI job can redirect it
                // into docs/index.html.
                print!("{}", output);
                if !output.ends_with('\n') {
                    println!();
                }
                Ok("stdout".to_string())
            }
        }
    }
}
