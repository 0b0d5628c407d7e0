use gantt_rs::GanttError;
use gantt_rs::api::{GanttEngine, GanttEngineConfig, NullHandler};
use gantt_rs::core::ViewMode;
use gantt_rs::interaction::AutoScrollConfig;

fn init_with(config: GanttEngineConfig) -> Result<GanttEngine<NullHandler>, GanttError> {
    GanttEngine::new(NullHandler, config, Vec::new())
}

#[test]
fn invalid_geometry_is_rejected_at_init() {
    let base = GanttEngineConfig::new(ViewMode::Day);
    let invalid = [
        base.with_column_width(0.0),
        base.with_column_width(f64::NAN),
        base.with_row_geometry(-1.0, 10.0),
        base.with_row_geometry(20.0, 30.0),
        base.with_viewport(0.0, 600.0),
        base.with_comparison_levels(0),
        base.with_time_step_ms(0),
        base.with_auto_scroll(AutoScrollConfig {
            step_px: 0.0,
            ..AutoScrollConfig::default()
        }),
    ];
    for config in invalid {
        let err = init_with(config).err().expect("config must be rejected");
        assert!(matches!(err, GanttError::InvalidConfig(_)), "{config:?}");
    }
    assert!(init_with(base).is_ok());
}

#[test]
fn json_config_fills_defaults() {
    let config = GanttEngineConfig::from_json_str(r#"{ "view_mode": "Week", "rtl": true }"#)
        .expect("parse config");
    assert_eq!(config.view_mode, ViewMode::Week);
    assert!(config.rtl);
    assert_eq!(config.column_width, 60.0);
    assert_eq!(config.row_height, 50.0);
    assert_eq!(config.task_height, 30.0);
    assert_eq!(config.comparison_levels, 1);
    assert_eq!(config.time_step_ms, 300_000);
    assert!(config.check_dependency_warnings);
    assert!(!config.show_critical_path);
    assert!(config.move_children_with_parent);
    assert_eq!(config, GanttEngineConfig::new(ViewMode::Week).with_rtl(true));
}

#[test]
fn json_config_round_trips_custom_settings() {
    let config = GanttEngineConfig::new(ViewMode::QuarterDay)
        .with_comparison_levels(3)
        .with_working_dates_only(true)
        .with_hierarchy_relations(true);
    let json = config.to_json_pretty().expect("serialize config");
    assert!(json.contains("\"QuarterDay\""));
    assert_eq!(
        GanttEngineConfig::from_json_str(&json).expect("parse config"),
        config
    );
}

#[test]
fn malformed_json_is_invalid_data() {
    let err = GanttEngineConfig::from_json_str(r#"{ "column_width": 10 }"#)
        .expect_err("view_mode is required");
    assert!(matches!(err, GanttError::InvalidData(_)));
}

#[test]
fn rejected_update_keeps_the_previous_config() {
    let mut engine = init_with(GanttEngineConfig::new(ViewMode::Day)).expect("engine init");
    let err = engine
        .set_config(GanttEngineConfig::new(ViewMode::Month).with_column_width(-5.0))
        .expect_err("negative width");
    assert!(matches!(err, GanttError::InvalidConfig(_)));
    assert_eq!(engine.config().view_mode, ViewMode::Day);

    engine
        .set_config(GanttEngineConfig::new(ViewMode::Month).with_column_width(120.0))
        .expect("valid update");
    assert_eq!(engine.config().column_width, 120.0);
    assert_eq!(engine.layout().space.column_width, 120.0);
}
