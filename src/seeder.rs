use crate::error::SeedError;
use crate::models::SeedSummary;
use crate::places::normalize::{spot_from_place, PhotoSettings};
use crate::places::{PlacesSearch, SearchNearbyRequest, SearchNearbyResponse, SearchQuery};
use crate::store::SpotStore;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Everything a run needs besides its collaborators
#[derive(Debug, Clone)]
pub struct SeederOptions {
    pub query: SearchQuery,
    /// Page budget; values below 1 still fetch one page
    pub pages: u32,
    pub page_delay: Duration,
    pub photos: PhotoSettings,
}

/// Fetches tourist attractions page by page and stores each new one
pub struct Seeder<P, S> {
    places: P,
    store: S,
    options: SeederOptions,
}

impl<P: PlacesSearch, S: SpotStore> Seeder<P, S> {
    pub fn new(places: P, store: S, options: SeederOptions) -> Self {
        Self {
            places,
            store,
            options,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the seeding pass.
    ///
    /// Stops at the first failed page; spots written before that stay put.
    pub async fn run(&self) -> Result<SeedSummary, SeedError> {
        let mut summary = SeedSummary::default();

        match self.run_pages(&mut summary).await {
            Ok(()) => {
                info!(
                    "Seeding finished: {} created, {} skipped",
                    summary.created, summary.skipped
                );
                Ok(summary)
            }
            Err(e) => {
                warn!(
                    "Seeding aborted after {} page(s): {} created, {} skipped so far",
                    summary.pages, summary.created, summary.skipped
                );
                Err(e)
            }
        }
    }

    async fn run_pages(&self, summary: &mut SeedSummary) -> Result<(), SeedError> {
        let budget = self.options.pages.max(1);
        let mut page_token: Option<String> = None;

        for page in 1..=budget {
            info!("Fetching page {}/{} from {}", page, budget, self.places.source_name());

            let request = SearchNearbyRequest::new(&self.options.query, page_token.take());
            let response = self.places.search_nearby(&request).await?;
            summary.pages = page;

            info!("Found {} places on page {}", response.places.len(), page);
            self.store_page(&response, summary).await?;

            match response.next_page_token {
                Some(token) if page < budget && !token.is_empty() => {
                    debug!("Waiting {:?} before next page", self.options.page_delay);
                    tokio::time::sleep(self.options.page_delay).await;
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        Ok(())
    }

    async fn store_page(
        &self,
        response: &SearchNearbyResponse,
        summary: &mut SeedSummary,
    ) -> Result<(), SeedError> {
        for place in &response.places {
            let Some(spot) = spot_from_place(place, &self.options.photos) else {
                debug!("Skipping place without a display name: {:?}", place.id);
                summary.skipped += 1;
                continue;
            };

            if self.store.insert_if_absent(&spot).await? {
                debug!("Created spot: {}", spot.name);
                summary.created += 1;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::types::{LocalizedText, Place};
    use crate::places::PlacesError;
    use crate::store::SqliteSpotStore;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned pages and records the token of every request
    struct ScriptedPlaces {
        pages: Mutex<VecDeque<Result<SearchNearbyResponse, PlacesError>>>,
        tokens: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedPlaces {
        fn new(pages: Vec<Result<SearchNearbyResponse, PlacesError>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                tokens: Mutex::new(Vec::new()),
            }
        }

        fn tokens(&self) -> Vec<Option<String>> {
            self.tokens.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PlacesSearch for ScriptedPlaces {
        async fn search_nearby(
            &self,
            request: &SearchNearbyRequest,
        ) -> Result<SearchNearbyResponse, PlacesError> {
            self.tokens.lock().unwrap().push(request.page_token.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .expect("no more scripted pages")
        }

        fn source_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn place(name: &str) -> Place {
        Place {
            display_name: Some(LocalizedText {
                text: Some(name.to_string()),
            }),
            ..Place::default()
        }
    }

    fn page(names: &[&str], next: Option<&str>) -> Result<SearchNearbyResponse, PlacesError> {
        Ok(SearchNearbyResponse {
            places: names.iter().map(|n| place(n)).collect(),
            next_page_token: next.map(str::to_string),
        })
    }

    fn server_error() -> Result<SearchNearbyResponse, PlacesError> {
        Err(PlacesError::Status {
            status: 500,
            body: "internal".to_string(),
        })
    }

    fn options(pages: u32) -> SeederOptions {
        SeederOptions {
            query: SearchQuery::default(),
            pages,
            page_delay: Duration::ZERO,
            photos: PhotoSettings {
                media_base_url: "https://places.googleapis.com/v1".to_string(),
                max_width_px: 800,
                api_key: "KEY".to_string(),
            },
        }
    }

    async fn seeder(
        pages: Vec<Result<SearchNearbyResponse, PlacesError>>,
        budget: u32,
    ) -> Seeder<ScriptedPlaces, SqliteSpotStore> {
        Seeder::new(
            ScriptedPlaces::new(pages),
            SqliteSpotStore::in_memory().await,
            options(budget),
        )
    }

    #[tokio::test]
    async fn creates_named_places_and_skips_unnamed() {
        let seeder = seeder(vec![page(&["Taipei 101", "", "Longshan Temple"], None)], 1).await;

        let summary = seeder.run().await.unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(seeder.store().count().await.unwrap(), 2);
        assert!(seeder.store().find_by_name("Taipei 101").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn malformed_fields_do_not_drop_the_page() {
        let messy: SearchNearbyResponse = serde_json::from_value(serde_json::json!({
            "places": [
                {"displayName": {"text": "Taipei 101"}, "rating": 4.6},
                {"displayName": {"text": "Longshan Temple"}, "rating": "4.5"},
                {"displayName": {"text": "Beitou Hot Spring"}, "photos": [{"widthPx": 100}]},
                {"displayName": {"text": "Jiufen"}, "location": {"latitude": "not-a-number", "longitude": 121.84}}
            ]
        }))
        .unwrap();
        let seeder = seeder(vec![Ok(messy)], 1).await;

        let summary = seeder.run().await.unwrap();

        assert_eq!(summary.created, 4);
        let store = seeder.store();
        let temple = store.find_by_name("Longshan Temple").await.unwrap().unwrap();
        assert_eq!(temple.rating, Some(4.5));
        let beitou = store.find_by_name("Beitou Hot Spring").await.unwrap().unwrap();
        assert_eq!(beitou.photo_url, None);
        let jiufen = store.find_by_name("Jiufen").await.unwrap().unwrap();
        assert_eq!(jiufen.latitude, None);
        assert_eq!(jiufen.longitude, Some(121.84));
    }

    #[tokio::test]
    async fn duplicate_names_are_created_once() {
        let seeder = seeder(vec![page(&["Taipei 101", "Taipei 101"], None)], 1).await;

        let summary = seeder.run().await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(seeder.store().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn second_page_carries_continuation_token() {
        let seeder = seeder(
            vec![page(&["A"], Some("tok-1")), page(&["B"], Some("tok-2"))],
            2,
        )
        .await;

        let summary = seeder.run().await.unwrap();

        assert_eq!(seeder.places.tokens(), vec![None, Some("tok-1".to_string())]);
        assert_eq!(summary.pages, 2);
        assert_eq!(summary.created, 2);
    }

    #[tokio::test]
    async fn single_page_budget_ignores_token() {
        let seeder = seeder(vec![page(&["A"], Some("tok-1"))], 1).await;

        seeder.run().await.unwrap();

        assert_eq!(seeder.places.tokens(), vec![None]);
    }

    #[tokio::test]
    async fn zero_page_budget_still_fetches_one_page() {
        let seeder = seeder(vec![page(&["A"], Some("tok-1"))], 0).await;

        let summary = seeder.run().await.unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(seeder.places.tokens().len(), 1);
    }

    #[tokio::test]
    async fn stops_when_no_token_returned() {
        let seeder = seeder(vec![page(&["A"], None)], 5).await;

        let summary = seeder.run().await.unwrap();

        assert_eq!(summary.pages, 1);
        assert_eq!(seeder.places.tokens().len(), 1);
    }

    #[tokio::test]
    async fn failure_on_first_page_creates_nothing() {
        let seeder = seeder(vec![server_error()], 2).await;

        let err = seeder.run().await.unwrap_err();

        assert!(matches!(
            err,
            SeedError::Places(PlacesError::Status { status: 500, .. })
        ));
        assert_eq!(seeder.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failure_on_second_page_keeps_first_page() {
        let seeder = seeder(vec![page(&["A", "B"], Some("tok-1")), server_error()], 2).await;

        let err = seeder.run().await.unwrap_err();

        assert!(matches!(err, SeedError::Places(_)));
        assert_eq!(seeder.store().count().await.unwrap(), 2);
        assert!(seeder.store().find_by_name("A").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rerun_creates_nothing_new() {
        let store = SqliteSpotStore::in_memory().await;
        let first = Seeder::new(
            ScriptedPlaces::new(vec![page(&["A", "B"], None)]),
            store,
            options(1),
        );
        assert_eq!(first.run().await.unwrap().created, 2);

        let second = Seeder::new(
            ScriptedPlaces::new(vec![page(&["A", "B", "C"], None)]),
            first.store,
            options(1),
        );
        let summary = second.run().await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(second.store().count().await.unwrap(), 3);
    }
}
