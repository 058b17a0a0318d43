//! Session tests: analytics emission, currency surface, reporting.

use std::any::Any;
use std::sync::Arc;

use chrono::{Duration, Utc};
use prize_wheel_core::{
    command::SessionCommand,
    config::WheelConfig,
    engine::{SpinAttempt, SpinEngine},
    error::{WheelError, WheelResult},
    event::WheelEvent,
    pity::Roll,
    rng::ScriptedSource,
    session::{SessionStats, SpinSession},
    sink::{AnalyticsSink, MemorySink},
};

fn open(coupons: u32, rolls: Vec<u32>) -> SpinSession {
    let engine = Arc::new(SpinEngine::from_config(&WheelConfig::default()).unwrap());
    SpinSession::open(
        "session-test".into(),
        engine,
        coupons,
        Box::new(ScriptedSource::with_rolls(rolls)),
        Box::new(MemorySink::new()),
    )
}

fn events(session: &SpinSession) -> Vec<WheelEvent> {
    session.sink_as::<MemorySink>().expect("memory sink").events().to_vec()
}

#[test]
fn accepted_spin_emits_start_result_and_prize() {
    let mut session = open(3, vec![50]);

    let outcome = session.spin().outcome().cloned().unwrap();
    let prize = session.finish_spin(outcome.index).unwrap();
    assert_eq!(prize.name, "50 Platinum");

    assert_eq!(
        events(&session),
        vec![
            WheelEvent::SessionStarted { session_id: "session-test".into(), coupons: 3 },
            WheelEvent::SpinStarted { spin_number: 1, coupons_left: 2 },
            WheelEvent::SpinResolved {
                roll:              Roll::Drawn(50),
                index:             6,
                prize_name:        "50 Platinum".into(),
                is_pity_win:       false,
                pity_count_after:  1,
                total_spins_after: 1,
            },
            WheelEvent::PrizeReceived { prize: "50 Platinum".into(), pity_win: false },
        ]
    );
}

#[test]
fn forced_spin_emits_pity_win() {
    let mut session = open(11, vec![50]);

    for _ in 0..10 {
        let outcome = session.spin().outcome().cloned().unwrap();
        session.finish_spin(outcome.index).unwrap();
    }
    let outcome = session.spin().outcome().cloned().unwrap();
    assert!(outcome.forced);
    session.finish_spin(outcome.index).unwrap();

    let sink = session.sink_as::<MemorySink>().unwrap();
    assert_eq!(sink.count("pity_win"), 1);
    assert_eq!(sink.count("spin_resolved"), 11);
    assert_eq!(session.stats().pity_wins, 1);

    let last_events = &sink.events()[sink.events().len() - 4..];
    assert!(matches!(
        last_events[1],
        WheelEvent::SpinResolved { roll: Roll::Forced, index: 2, is_pity_win: true, pity_count_after: 0, .. }
    ));
    assert_eq!(last_events[2], WheelEvent::PityWin { spin_number: 11, pity_threshold: 10 });
    assert_eq!(
        last_events[3],
        WheelEvent::PrizeReceived { prize: "Legendary Item".into(), pity_win: true }
    );
}

#[test]
fn rejected_spin_is_reported_not_raised() {
    let mut session = open(0, vec![50]);

    let attempt = session.spin();
    assert!(!attempt.is_accepted());
    assert_eq!(session.state().coupons(), 0);
    assert_eq!(session.stats().rejected, 1);
    assert_eq!(
        events(&session).last(),
        Some(&WheelEvent::SpinRejected { reason: "no_coupons".into(), coupons: 0 })
    );
}

#[test]
fn top_up_grants_configured_bundle() {
    let mut session = open(0, vec![50]).with_top_up_amount(10);

    assert_eq!(session.top_up(), 10);
    assert_eq!(session.grant_coupons(5), 15);
    assert!(session.consume_coupon());
    assert_eq!(session.state().coupons(), 14);

    let sink = session.sink_as::<MemorySink>().unwrap();
    assert_eq!(sink.count("coupons_granted"), 2);
    assert_eq!(
        sink.events()[1],
        WheelEvent::CouponsGranted { amount: 10, balance: 10 }
    );
}

#[test]
fn shop_redirect_is_tracked() {
    let mut session = open(0, vec![]);
    session.shop_redirect();
    assert_eq!(events(&session).last(), Some(&WheelEvent::ShopRedirect));
}

#[test]
fn abandon_frees_the_session_for_another_spin() {
    let mut session = open(2, vec![50]);

    assert!(session.spin().is_accepted());
    assert!(!session.spin().is_accepted());
    session.abandon();
    assert!(session.spin().is_accepted());
}

#[test]
fn view_reports_pity_bar_and_balance() {
    let mut session = open(5, vec![50]);
    for _ in 0..4 {
        let outcome = session.spin().outcome().cloned().unwrap();
        session.finish_spin(outcome.index).unwrap();
    }

    let view = session.view(Utc::now());
    assert_eq!(view.session_id, "session-test");
    assert_eq!(view.coupons, 1);
    assert_eq!(view.pity_count, 4);
    assert_eq!(view.pity_threshold, 10);
    assert!((view.pity_progress - 0.4).abs() < 1e-12);
    assert!(!view.pity_ready);
    assert!(!view.spinning);
    assert_eq!(view.total_spins, 4);
    assert!((session.pity_progress() - 0.4).abs() < 1e-12);
}

#[test]
fn spins_per_minute_uses_elapsed_time() {
    let started = Utc::now();
    let mut stats = SessionStats::new(started);
    assert_eq!(stats.spins_per_minute(started), 0.0);

    stats.total_spins = 6;
    let rate = stats.spins_per_minute(started + Duration::seconds(120));
    assert!((rate - 3.0).abs() < 1e-9, "rate {rate}");
}

struct FailingSink;

impl AnalyticsSink for FailingSink {
    fn name(&self) -> &'static str { "failing" }

    fn record(&mut self, _session_id: &str, _spin: u64, _event: &WheelEvent) -> WheelResult<()> {
        Err(WheelError::Config { reason: "sink offline".into() })
    }

    fn as_any(&self) -> &dyn Any { self }
}

#[test]
fn failed_delivery_never_blocks_a_spin() {
    let engine = Arc::new(SpinEngine::from_config(&WheelConfig::default()).unwrap());
    let mut session = SpinSession::open(
        SpinSession::generate_id(),
        engine,
        1,
        Box::new(ScriptedSource::with_rolls(vec![90])),
        Box::new(FailingSink),
    );

    let outcome = match session.spin() {
        SpinAttempt::Accepted(outcome) => outcome,
        other => panic!("spin rejected: {other:?}"),
    };
    assert_eq!(outcome.index, 7);
    assert_eq!(session.finish_spin(7).unwrap().name, "Premium 30 days");
}

#[test]
fn from_config_uses_configured_balances() {
    let mut config = WheelConfig::default();
    config.initial_coupons = 2;
    config.top_up_amount = 4;

    let mut session = SpinSession::from_config(
        &config,
        Box::new(ScriptedSource::default()),
        Box::new(MemorySink::new()),
    )
    .unwrap();
    assert_eq!(session.state().coupons(), 2);
    assert_eq!(session.top_up(), 6);
    assert_eq!(session.id().len(), 36, "uuid v4 string");
}

#[test]
fn host_commands_parse_from_json_lines() {
    let cases = [
        (r#"{"cmd":"spin"}"#, SessionCommand::Spin),
        (r#"{"cmd":"complete","index":3}"#, SessionCommand::Complete { index: 3 }),
        (r#"{"cmd":"grant_coupons","amount":10}"#, SessionCommand::GrantCoupons { amount: 10 }),
        (r#"{"cmd":"top_up"}"#, SessionCommand::TopUp),
        (r#"{"cmd":"shop_redirect"}"#, SessionCommand::ShopRedirect),
        (r#"{"cmd":"abandon"}"#, SessionCommand::Abandon),
        (r#"{"cmd":"get_state"}"#, SessionCommand::GetState),
        (r#"{"cmd":"quit"}"#, SessionCommand::Quit),
    ];
    for (line, expected) in cases {
        let parsed: SessionCommand = serde_json::from_str(line).unwrap();
        assert_eq!(parsed, expected, "{line}");
    }
}
