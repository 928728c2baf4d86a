//! wasm-bindgen surface used by the page scripts

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use wasm_bindgen::prelude::*;

use super::Snapshot;
use crate::config::GameConfig;
use crate::daily::DailyCountdown;
use crate::error::SessionError;
use crate::identity::{self, Credentials, SignInMode};
use crate::ranking::{Aggregator, rank_label};
use crate::sim::clock::{BrowserClock, Clock};
use crate::sim::{GameSession, PlayArea};
use crate::store::{self, LocalStorageStore, UserStore};

/// Play area measured from a DOM element's bounding rect
struct ElementArea<'a> {
    id: &'a str,
}

impl PlayArea for ElementArea<'_> {
    fn size(&self) -> Vec2 {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(self.id))
            .map(|el| {
                let rect = el.get_bounding_client_rect();
                Vec2::new(rect.width() as f32, rect.height() as f32)
            })
            .unwrap_or(Vec2::ZERO)
    }
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Validate the sign-in form and store the user
#[wasm_bindgen(js_name = signIn)]
pub fn sign_in(username: &str, email: &str, password: &str, register: bool) -> Result<(), JsValue> {
    let credentials = Credentials {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    let mode = if register {
        SignInMode::Register
    } else {
        SignInMode::Login
    };
    identity::sign_in(&mut LocalStorageStore, &credentials, mode)
        .map(|_| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn logout() -> Result<(), JsValue> {
    store::logout(&mut LocalStorageStore).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whether a user is signed in (pages redirect to sign-in otherwise)
#[wasm_bindgen(js_name = isSignedIn)]
pub fn is_signed_in() -> bool {
    LocalStorageStore.get().is_some()
}

/// "{h}h {m}m {s}s" until the daily board closes
#[wasm_bindgen(js_name = dailyCountdown)]
pub fn daily_countdown() -> String {
    DailyCountdown::now().to_string()
}

/// One browser game page
#[wasm_bindgen]
pub struct WebGame {
    session: GameSession<LocalStorageStore>,
    clock: BrowserClock,
    area_id: String,
}

#[wasm_bindgen]
impl WebGame {
    /// Fails with "not signed in" when there is no stored user
    #[wasm_bindgen(constructor)]
    pub fn new(area_id: &str) -> Result<WebGame, JsValue> {
        let clock = BrowserClock;
        let seed = clock.now_ms();
        let session = GameSession::new(LocalStorageStore, GameConfig::load(), seed)
            .map_err(|e: SessionError| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session,
            clock,
            area_id: area_id.to_string(),
        })
    }

    pub fn start(&mut self) {
        self.session.start(self.clock.now_ms());
    }

    /// Fire due timers; returns the resulting events as JSON
    pub fn tick(&mut self) -> String {
        let area = ElementArea { id: &self.area_id };
        let events = self.session.advance_to(self.clock.now_ms(), &area);
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }

    /// Hit a target by id; returns points awarded (0 if none)
    pub fn hit(&mut self, id: u32) -> u32 {
        self.session.hit(id).unwrap_or(0)
    }

    /// Hit whatever is under a click (play-area coordinates)
    #[wasm_bindgen(js_name = hitAt)]
    pub fn hit_at(&mut self, x: f32, y: f32) -> u32 {
        self.session.hit_at(Vec2::new(x, y)).unwrap_or(0)
    }

    /// Current frame state as JSON
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&Snapshot::of(&self.session)).unwrap_or_else(|_| "{}".to_string())
    }

    /// Leaderboard for the signed-in user as JSON
    pub fn ranking(&self) -> String {
        let aggregator = Aggregator::with_reference_players(self.session.config());
        let mut rng = Pcg32::seed_from_u64(self.clock.now_ms());
        let ranking = aggregator.aggregate(self.session.user(), &mut rng);
        log::info!(
            "{} is {}",
            ranking.user.username,
            rank_label(ranking.user.position)
        );
        serde_json::to_string(&ranking).unwrap_or_else(|_| "{}".to_string())
    }
}
