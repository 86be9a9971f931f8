// Carousel: round-robin advancement, error skipping, fast-fail, the
// all-errored halt, and mixed-mode visualisation flips. Paused-clock tests.
use std::sync::Arc;

use murmur_core::carousel::{Carousel, CarouselSignal, ServiceHealth};
use murmur_core::wire::DatabaseInfo;
use murmur_core::{Service, Settings, Visualisation};
use tokio::sync::broadcast;
use tokio::time::{timeout, Duration, Instant};

fn test_settings() -> Settings {
    Settings {
        carousel_time: [10_000, 10_000, 10_000],
        transition_hold: 10,
        ..Settings::default()
    }
}

fn health(service: Service, connected: bool) -> ServiceHealth {
    ServiceHealth {
        service,
        database_info: DatabaseInfo {
            is_connection_established: connected,
            is_connecting: false,
            next_reconnect: 0,
            number_of_db_reconnects: 0,
        },
    }
}

async fn next_theme_change(
    rx: &mut broadcast::Receiver<CarouselSignal>,
) -> (Service, Visualisation) {
    loop {
        match rx.recv().await.expect("signal channel closed") {
            CarouselSignal::ThemeChanged {
                service,
                visualisation,
            } => return (service, visualisation),
            CarouselSignal::TransitionStart { .. } => continue,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn services_rotate_in_round_robin_order() {
    let carousel = Carousel::new(Arc::new(test_settings()));
    let mut signals = carousel.signals();
    tokio::spawn(carousel.run());

    assert_eq!(next_theme_change(&mut signals).await.0, Service::Keeper);
    assert_eq!(next_theme_change(&mut signals).await.0, Service::Bloxberg);
    assert_eq!(next_theme_change(&mut signals).await.0, Service::Minerva);
}

#[tokio::test(start_paused = true)]
async fn transition_start_precedes_every_theme_change() {
    let carousel = Carousel::new(Arc::new(test_settings()));
    let mut signals = carousel.signals();
    tokio::spawn(carousel.run());

    match signals.recv().await.unwrap() {
        CarouselSignal::TransitionStart { next, .. } => assert_eq!(next, Service::Keeper),
        other => panic!("expected a transition start, got {other:?}"),
    }
    match signals.recv().await.unwrap() {
        CarouselSignal::ThemeChanged { service, .. } => assert_eq!(service, Service::Keeper),
        other => panic!("expected a theme change, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn errored_services_are_skipped() {
    let carousel = Carousel::new(Arc::new(test_settings()));
    let mut signals = carousel.signals();
    let health_tx = carousel.health_sender();
    tokio::spawn(carousel.run());

    health_tx.send(health(Service::Keeper, false)).await.unwrap();

    assert_eq!(next_theme_change(&mut signals).await.0, Service::Bloxberg);
}

#[tokio::test(start_paused = true)]
async fn a_failing_displayed_service_forces_an_immediate_transition() {
    let carousel = Carousel::new(Arc::new(test_settings()));
    let mut signals = carousel.signals();
    let health_tx = carousel.health_sender();
    tokio::spawn(carousel.run());

    let start = Instant::now();
    health_tx.send(health(Service::Minerva, false)).await.unwrap();

    let (service, _) = next_theme_change(&mut signals).await;
    assert_eq!(service, Service::Keeper);
    assert!(
        start.elapsed() < Duration::from_secs(10),
        "fast-fail must not wait out the countdown"
    );
}

#[tokio::test(start_paused = true)]
async fn the_carousel_halts_when_every_service_fails_and_resumes_on_recovery() {
    let carousel = Carousel::new(Arc::new(test_settings()));
    let mut signals = carousel.signals();
    let health_tx = carousel.health_sender();
    tokio::spawn(carousel.run());

    health_tx.send(health(Service::Keeper, false)).await.unwrap();
    health_tx.send(health(Service::Bloxberg, false)).await.unwrap();
    health_tx.send(health(Service::Minerva, false)).await.unwrap();

    let halted = timeout(Duration::from_secs(120), next_theme_change(&mut signals)).await;
    assert!(halted.is_err(), "no transition may fire while every service is down");

    health_tx.send(health(Service::Keeper, true)).await.unwrap();
    assert_eq!(next_theme_change(&mut signals).await.0, Service::Keeper);
}

#[tokio::test(start_paused = true)]
async fn the_last_healthy_service_sticks() {
    let carousel = Carousel::new(Arc::new(test_settings()));
    let mut signals = carousel.signals();
    let health_tx = carousel.health_sender();
    tokio::spawn(carousel.run());

    health_tx.send(health(Service::Keeper, false)).await.unwrap();
    health_tx.send(health(Service::Bloxberg, false)).await.unwrap();

    // the wrapping search lands back on the only healthy service
    assert_eq!(next_theme_change(&mut signals).await.0, Service::Minerva);
    assert_eq!(next_theme_change(&mut signals).await.0, Service::Minerva);
}

#[tokio::test(start_paused = true)]
async fn mixed_mode_alternates_visualisations_on_every_transition() {
    let settings = Settings {
        mixed: true,
        ..test_settings()
    };
    let carousel = Carousel::new(Arc::new(settings));
    let mut signals = carousel.signals();
    tokio::spawn(carousel.run());

    assert_eq!(next_theme_change(&mut signals).await.1, Visualisation::Geo);
    assert_eq!(next_theme_change(&mut signals).await.1, Visualisation::ListenTo);
}

#[tokio::test(start_paused = true)]
async fn a_pinned_service_never_advances() {
    let settings = Settings {
        carousel_mode: false,
        ..test_settings()
    };
    let carousel = Carousel::new(Arc::new(settings));
    let mut signals = carousel.signals();
    // keep the health sender alive so the loop does not exit
    let _health_tx = carousel.health_sender();
    tokio::spawn(carousel.run());

    let advanced = timeout(Duration::from_secs(120), next_theme_change(&mut signals)).await;
    assert!(advanced.is_err());
}

#[tokio::test(start_paused = true)]
async fn a_pinned_service_stays_pinned_through_a_full_outage_and_recovery() {
    let settings = Settings {
        carousel_mode: false,
        ..test_settings()
    };
    let carousel = Carousel::new(Arc::new(settings));
    let mut signals = carousel.signals();
    let health_tx = carousel.health_sender();
    tokio::spawn(carousel.run());

    for service in [Service::Minerva, Service::Keeper, Service::Bloxberg] {
        health_tx.send(health(service, false)).await.unwrap();
    }
    health_tx.send(health(Service::Keeper, true)).await.unwrap();

    // no transition signal of any kind, not even a jingle cue
    let signal = timeout(Duration::from_secs(120), signals.recv()).await;
    assert!(
        signal.is_err(),
        "recovery must not rotate the display off the pinned service"
    );
}
