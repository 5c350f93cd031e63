#[cfg(test)]
mod tests {
    use fuel_dashboard::config::Config;
    use fuel_dashboard::hooks::use_selection::SelectionState;
    use fuel_dashboard::hooks::use_sites::SitesState;
    use fuel_dashboard::models::{
        chart::ChartSeries,
        error::AppError,
        metrics::{
            MetricsResult, SalesSlice, Site, SiteDetail, VolumeBreakdown, VolumeEstimatePolicy,
            VolumeSource,
        },
        selection::{Dimensions, Selection, SelectionAction, SiteScope},
    };
    use fuel_dashboard::services::{
        aggregate::{aggregate, aggregate_results, compose_summary},
        animator::{Animator, resolve_target},
        api::ApiConfig,
        orchestrator::{DatasetId, FetchMachine, FetchState, Resolution},
        persistence::{MemoryBackend, SelectionStore},
        query::shape,
    };
    use fuel_dashboard::utils::format::{NO_DATA, Unit, format_optional, format_value, reconstruct};
    use std::rc::Rc;
    use yew::Reducible;

    // Helper function to create a site selection
    fn site_selection(months: &[i64], years: &[i64]) -> Selection {
        Selection::normalize("7", months.iter().copied(), years.iter().copied())
    }

    fn metrics(net_sales: f64, profit: f64, volume: f64, ppl: f64) -> MetricsResult {
        MetricsResult {
            net_sales: Some(net_sales),
            profit: Some(profit),
            total_fuel_volume: Some(volume),
            avg_ppl: Some(ppl),
            profit_margin: Some(profit / net_sales * 100.0),
            ..Default::default()
        }
    }

    // ===== Error Type Tests =====

    #[test]
    fn test_app_error_transport_display() {
        let error = AppError::Transport("Connection refused".to_string());
        assert_eq!(error.to_string(), "Transport error: Connection refused");
        assert!(error.is_transport());
    }

    #[test]
    fn test_app_error_data_display() {
        let error = AppError::DataError("Invalid data".to_string());
        assert_eq!(error.to_string(), "Data error: Invalid data");
        assert!(!error.is_transport());
    }

    #[test]
    fn test_app_error_persisted_state_display() {
        let error = AppError::MalformedPersistedState("expected value".to_string());
        assert_eq!(error.to_string(), "Malformed persisted state: expected value");
    }

    // ===== Selection Tests =====

    #[test]
    fn test_default_selection() {
        let selection = Selection::default();
        assert_eq!(selection.site(), &SiteScope::All);
        assert_eq!(selection.months().iter().copied().collect::<Vec<_>>(), vec![11]);
        assert_eq!(selection.years().iter().copied().collect::<Vec<_>>(), vec![2025]);
        assert!(!selection.is_queryable());
    }

    #[test]
    fn test_normalize_idempotent() {
        let once = Selection::normalize("7", [11, 10, 10, 14], [2025, 2024]);
        let twice = Selection::normalize(
            once.site().as_str(),
            once.months().iter().map(|m| i64::from(*m)),
            once.years().iter().map(|y| i64::from(*y)),
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn test_all_site_is_case_insensitive() {
        assert_eq!(Selection::normalize("ALL", [1], [2025]).site(), &SiteScope::All);
        assert_eq!(Selection::normalize("", [1], [2025]).site(), &SiteScope::All);
    }

    #[test]
    fn test_reducer_keeps_state_on_noop() {
        let state = Rc::new(SelectionState(site_selection(&[11], &[2025])));
        let next = state.clone().reduce(SelectionAction::SetSite("7".to_string()));
        assert!(Rc::ptr_eq(&state, &next));

        let toggled = next.reduce(SelectionAction::ToggleMonth(10));
        assert_eq!(toggled.0, site_selection(&[10, 11], &[2025]));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let selection = site_selection(&[1, 2], &[2023]).reduce(SelectionAction::Reset);
        assert_eq!(selection, Selection::default());
    }

    // ===== Query Shaper Tests =====

    #[test]
    fn test_shape_plural_months_singular_year() {
        let params = shape(&site_selection(&[10, 11], &[2025]), Dimensions::MONTH_AND_YEAR);
        assert_eq!(params.to_query_string(), "siteId=7&months=10,11&year=2025");
    }

    #[test]
    fn test_shape_plural_years() {
        let params = shape(&site_selection(&[3], &[2025, 2024]), Dimensions::MONTH_AND_YEAR);
        assert_eq!(params.get("month"), Some("3"));
        assert_eq!(params.get("years"), Some("2024,2025"));
        assert!(!params.contains("year"));
    }

    #[test]
    fn test_shape_site_only_consumer() {
        let params = shape(&site_selection(&[10, 11], &[2025]), Dimensions::SITE_ONLY);
        assert_eq!(params.to_query_string(), "siteId=7");
    }

    #[test]
    fn test_shape_encodes_site_id_but_not_list_commas() {
        let selection = Selection::normalize("north, east", [10, 11], [2025]);
        let params = shape(&selection, Dimensions::MONTH_AND_YEAR);
        assert_eq!(
            params.to_query_string(),
            "siteId=north%2C%20east&months=10,11&year=2025"
        );
    }

    // ===== Fetch Orchestrator Tests =====

    #[test]
    fn test_empty_months_issue_no_request() {
        let mut machine = FetchMachine::<MetricsResult>::new(Dimensions::MONTH_AND_YEAR);
        assert!(machine.select(&site_selection(&[], &[2025])).is_none());
        assert_eq!(machine.state(), &FetchState::Idle);
    }

    #[test]
    fn test_site_only_consumer_ignores_empty_months() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::SITE_ONLY);
        assert!(machine.select(&site_selection(&[], &[])).is_some());
        assert!(machine.state().is_loading());
    }

    #[test]
    fn test_last_initiated_request_wins() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::MONTH_AND_YEAR);
        let a = machine.select(&site_selection(&[10], &[2025])).unwrap();
        let b = machine.select(&site_selection(&[11], &[2025])).unwrap();

        // B arrives first, A straggles in afterwards
        assert_eq!(machine.resolve(b.token, Ok(2)), Resolution::Applied);
        assert_eq!(machine.resolve(a.token, Ok(1)), Resolution::Stale);

        assert_eq!(machine.state().data().map(|d| **d), Some(2));
        assert_eq!(machine.dataset(), b.token.dataset());
    }

    #[test]
    fn test_response_after_clearing_site_is_discarded() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::MONTH_AND_YEAR);
        let a = machine.select(&site_selection(&[10], &[2025])).unwrap();
        assert!(machine.select(&Selection::normalize("all", [10], [2025])).is_none());

        assert_eq!(machine.resolve(a.token, Ok(1)), Resolution::Stale);
        assert_eq!(machine.state(), &FetchState::Idle);
    }

    #[test]
    fn test_status_consumer_keeps_data_on_month_toggle() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::SITE_ONLY);
        let request = machine.select(&site_selection(&[10], &[2025])).unwrap();
        machine.resolve(request.token, Ok(9));

        let toggled = site_selection(&[10], &[2025]).reduce(SelectionAction::ToggleMonth(11));
        assert!(machine.select(&toggled).is_none());
        assert_eq!(machine.state().data().map(|d| **d), Some(9));
    }

    #[test]
    fn test_stale_failure_does_not_overwrite_success() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::MONTH_AND_YEAR);
        let a = machine.select(&site_selection(&[10], &[2025])).unwrap();
        let b = machine.select(&site_selection(&[11], &[2025])).unwrap();

        machine.resolve(b.token, Ok(5));
        machine.resolve(a.token, Err(AppError::Transport("timeout".to_string())));

        assert!(machine.state().error().is_none());
        assert_eq!(machine.state().data().map(|d| **d), Some(5));
    }

    #[test]
    fn test_disposed_machine_ignores_responses() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::MONTH_AND_YEAR);
        let request = machine.select(&site_selection(&[10], &[2025])).unwrap();
        machine.dispose();

        assert_eq!(machine.resolve(request.token, Ok(1)), Resolution::Disposed);
        assert!(machine.select(&site_selection(&[11], &[2025])).is_none());
    }

    #[test]
    fn test_failure_state_carries_message() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::MONTH_AND_YEAR);
        let request = machine.select(&site_selection(&[10], &[2025])).unwrap();
        machine.resolve(request.token, Err(AppError::NotFound("site 7".to_string())));

        assert_eq!(machine.state().error(), Some("Not found: site 7"));
        assert!(machine.refresh().is_some());
        assert!(machine.state().is_loading());
    }

    #[test]
    fn test_fetch_state_equality() {
        let a: FetchState<u32> = FetchState::Success(Rc::new(3));
        let b: FetchState<u32> = FetchState::Success(Rc::new(3));
        assert_eq!(a, b);
        assert_ne!(a, FetchState::Loading);
        assert_eq!(a.clone().data().map(|d| **d), Some(3));
    }

    // ===== Aggregation Tests =====

    #[test]
    fn test_single_scope_is_identity() {
        let single = metrics(100.0, 10.0, 50.0, 140.0);
        assert_eq!(aggregate(std::slice::from_ref(&single)), single);
    }

    #[test]
    fn test_aggregate_two_years() {
        let combined = aggregate(&[
            metrics(100.0, 10.0, 100.0, 140.0),
            metrics(300.0, 50.0, 300.0, 150.0),
        ]);

        assert_eq!(combined.net_sales, Some(400.0));
        assert_eq!(combined.profit, Some(60.0));
        assert_eq!(combined.total_fuel_volume, Some(400.0));
        assert_eq!(combined.avg_ppl, Some(147.5));
        assert!((combined.profit_margin.unwrap() - 15.0).abs() < 1e-9);
        assert_eq!(combined.transactions, None);
    }

    #[test]
    fn test_aggregate_partial_success() {
        let combined = aggregate_results(vec![
            Ok(metrics(100.0, 10.0, 100.0, 140.0)),
            Err(AppError::RateLimited),
        ])
        .unwrap();
        assert_eq!(combined.net_sales, Some(100.0));

        let failed = aggregate_results(vec![Err(AppError::RateLimited), Err(AppError::RateLimited)]);
        assert_eq!(failed, Err(AppError::RateLimited));
    }

    #[test]
    fn test_summary_keeps_metrics_when_site_lookup_fails() {
        let summary = compose_summary(
            Err(AppError::NotFound("site 7".to_string())),
            Ok(metrics(100.0, 10.0, 100.0, 140.0)),
        )
        .unwrap();

        assert!(summary.site_name.is_none());
        assert!(summary.is_partial());
        assert_eq!(summary.metrics.net_sales, Some(100.0));
    }

    #[test]
    fn test_summary_fails_when_both_halves_fail() {
        let result = compose_summary(
            Err(AppError::NotFound("site 7".to_string())),
            Err(AppError::Transport("offline".to_string())),
        );
        assert_eq!(result, Err(AppError::Transport("offline".to_string())));
    }

    #[test]
    fn test_summary_uses_display_city() {
        let detail = SiteDetail {
            id: "7".to_string(),
            name: "Northgate".to_string(),
            city: Some("leeds".to_string()),
            city_display: Some("Leeds".to_string()),
        };
        let summary = compose_summary(Ok(detail), Ok(MetricsResult::default())).unwrap();
        assert_eq!(summary.site_name.as_deref(), Some("Northgate"));
        assert_eq!(summary.city.as_deref(), Some("Leeds"));
        assert!(!summary.is_partial());
    }

    // ===== Volume Split Tests =====

    #[test]
    fn test_reported_volume_split() {
        let result = MetricsResult {
            bunkered_volume: Some(600.0),
            non_bunkered_volume: Some(400.0),
            total_fuel_volume: Some(1000.0),
            ..Default::default()
        };
        let split = VolumeBreakdown::from_metrics(&result, VolumeEstimatePolicy::Omit).unwrap();
        assert_eq!(split.source, VolumeSource::Reported);
        assert_eq!(split.total(), 1000.0);
    }

    #[test]
    fn test_estimated_volume_split_is_labelled() {
        let result = MetricsResult {
            total_fuel_volume: Some(1000.0),
            ..Default::default()
        };
        assert!(VolumeBreakdown::from_metrics(&result, VolumeEstimatePolicy::Omit).is_none());

        let split =
            VolumeBreakdown::from_metrics(&result, VolumeEstimatePolicy::default()).unwrap();
        assert_eq!(split.source, VolumeSource::Estimated);
        assert!((split.bunkered - 700.0).abs() < 1e-9);
        assert!((split.non_bunkered - 300.0).abs() < 1e-9);
    }

    // ===== Formatter Tests =====

    #[test]
    fn test_format_tiers() {
        assert_eq!(format_value(1_234_000.0, Unit::Currency), "£1.23M");
        assert_eq!(format_value(430_000.0, Unit::Volume), "430k L");
        assert_eq!(format_value(12.5, Unit::Percentage), "12.5%");
        assert_eq!(format_value(-3.26, Unit::Percentage), "-3.3%");
        assert_eq!(format_value(f64::NAN, Unit::Count), NO_DATA);
        assert_eq!(format_optional(None, Unit::Rate), NO_DATA);
    }

    #[test]
    fn test_format_rounding_carries_into_next_tier() {
        assert_eq!(format_value(999_999.9, Unit::Currency), "£1.00M");
        assert_eq!(format_value(999_600.0, Unit::Volume), "1.00M L");
        assert_eq!(format_value(999.96, Unit::Percentage), "1.0k%");
    }

    #[test]
    fn test_reconstruct_formatted_value() {
        for (value, unit) in [
            (1_234_000.0, Unit::Currency),
            (430_000.0, Unit::Volume),
            (147.52, Unit::Rate),
            (-18.4, Unit::Percentage),
        ] {
            let formatted = format_value(value, unit);
            let (back, back_unit) = reconstruct(&formatted).unwrap();
            assert_eq!(back_unit, unit, "unit of {formatted}");
            assert!((back - value).abs() <= value.abs() * 0.01, "value of {formatted}");
        }
        assert_eq!(reconstruct(NO_DATA), None);
    }

    // ===== Animator Tests =====

    #[test]
    fn test_animator_progress_is_monotonic() {
        let mut animator = Animator::new(1000);
        animator.arm(DatasetId::default(), 100.0, Unit::Currency);

        assert_eq!(animator.advance(100), 0.0);
        animator.start();

        let mut last = 0.0;
        for _ in 0..20 {
            let progress = animator.advance(60);
            assert!(progress >= last);
            assert!(progress <= 1.0);
            last = progress;
        }
        assert!(animator.is_finished());
        assert_eq!(animator.current_value(), 100.0);
        assert_eq!(animator.rendered(), "£100.00");
    }

    #[test]
    fn test_animator_rearms_only_on_new_dataset() {
        let mut machine = FetchMachine::<u32>::new(Dimensions::MONTH_AND_YEAR);
        let first = machine.select(&site_selection(&[10], &[2025])).unwrap();
        let second = machine.select(&site_selection(&[11], &[2025])).unwrap();

        let mut animator = Animator::new(1000);
        assert!(animator.arm(first.token.dataset(), 50.0, Unit::Count));
        animator.start();
        animator.advance(1000);

        assert!(!animator.arm(first.token.dataset(), 50.0, Unit::Count));
        assert_eq!(animator.state().progress, 1.0);

        assert!(animator.arm(second.token.dataset(), 80.0, Unit::Count));
        assert_eq!(animator.state().progress, 0.0);
        assert!(!animator.state().has_started);
    }

    #[test]
    fn test_resolve_target_from_formatted_string() {
        assert_eq!(resolve_target(None, Some("£1.5k"), None), Some((1500.0, Unit::Currency)));
        assert_eq!(resolve_target(Some(3.0), None, Some(Unit::Rate)), Some((3.0, Unit::Rate)));
        assert_eq!(resolve_target(None, Some(NO_DATA), None), None);
    }

    // ===== Persistence Tests =====

    #[test]
    fn test_store_falls_back_on_malformed_state() {
        let backend = MemoryBackend::with_value(Config::SELECTION_STORAGE_KEY, "{not json");
        let store = SelectionStore::open(backend);

        assert_eq!(store.current(), &Selection::default());
        assert!(matches!(
            store.recovered_error(),
            Some(AppError::MalformedPersistedState(_))
        ));
    }

    #[test]
    fn test_store_falls_back_on_incomplete_state() {
        for raw in ["{}", "[]", r#"{"site":"7"}"#, r#"["7",[10],[2025]]"#] {
            let store =
                SelectionStore::open(MemoryBackend::with_value(Config::SELECTION_STORAGE_KEY, raw));
            assert_eq!(store.current(), &Selection::default(), "stored {raw}");
            assert!(store.recovered_error().is_some(), "stored {raw}");
        }
    }

    #[test]
    fn test_store_accepts_month_labels() {
        let backend = MemoryBackend::with_value(
            Config::SELECTION_STORAGE_KEY,
            r#"{"site":"7","months":["October","nov"],"years":[2025]}"#,
        );
        let store = SelectionStore::open(backend);
        assert_eq!(store.current(), &site_selection(&[10, 11], &[2025]));
    }

    #[test]
    fn test_store_persists_updates() {
        let mut store = SelectionStore::open(MemoryBackend::default());
        store.update(site_selection(&[10, 11], &[2025])).unwrap();

        let raw = store.backend().raw().unwrap();
        assert_eq!(Selection::restore(Some(&raw)), site_selection(&[10, 11], &[2025]));

        store.reset();
        assert!(store.backend().raw().is_none());
        assert_eq!(store.current(), &Selection::default());
    }

    // ===== API Config Tests =====

    #[test]
    fn test_metrics_url_includes_query() {
        let config = ApiConfig::builder().base_url("http://example.test/api").build();
        let params = shape(&site_selection(&[11], &[2025]), Dimensions::MONTH_AND_YEAR);
        let url = config.metrics_url(&params);

        assert!(url.starts_with("http://example.test/api/"));
        assert!(url.ends_with("?siteId=7&month=11&year=2025"));
    }

    // ===== Chart and Sites Tests =====

    #[test]
    fn test_sales_distribution_drops_noise() {
        let slices = vec![
            SalesSlice {
                name: "Fuel".to_string(),
                value: 900.0,
            },
            SalesSlice {
                name: "Shop".to_string(),
                value: 100.0,
            },
            SalesSlice {
                name: "Car wash".to_string(),
                value: 0.0,
            },
        ];
        let series = ChartSeries::from_sales_distribution(&slices).without_noise();

        assert_eq!(series.points().len(), 2);
        assert_eq!(series.total(), 1000.0);
        assert!(series.points().iter().all(|p| p.color.is_some()));
    }

    #[test]
    fn test_sites_state_list() {
        let site = Site {
            id: "7".to_string(),
            name: "Northgate".to_string(),
        };
        assert!(SitesState::Loading.sites().is_empty());
        assert_eq!(SitesState::Loaded(Rc::new(vec![site.clone()])).sites(), &[site]);
    }
}
