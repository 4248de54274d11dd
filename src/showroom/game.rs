//=========================================================================
// Showroom Game State
//=========================================================================
//
// Car turntable screen.
//
// Lifecycle:
// - construct: scene (ambient light), camera, composer (render + bloom),
//   registration with the asset gate (first construct only)
// - enter:     startup + engine sounds, tweens rewound
// - update:    tweens → hover highlight → click → render
// - exit:      sounds stopped
// - dispose:   scene, sounds and pipeline dropped
//
// Asset delivery: the gate callback runs on the loader thread, so it only
// forwards the bundle through a channel. The state picks it up on its own
// thread at the start of `enter` and `update` and keeps it, so a disposed
// state rebuilds from the same bundle without registering again.
//
//=========================================================================

use std::sync::Arc;

use crossbeam_channel::{bounded, Receiver, TryRecvError};
use glam::Vec3;
use log::{debug, error, trace};

use super::{ShowroomEvent, CAR_ENGINE_SOUND, CAR_MODEL, CAR_STARTUP_SOUND, CAR_TEXTURE};
use crate::core::animation::{AnimationService, Easing, Property, Repeat, Tween, Tweens};
use crate::core::assets::AssetBundle;
use crate::core::audio::{AudioListener, Sound, SoundSlot};
use crate::core::globals::GlobalContext;
use crate::core::input::MouseButton;
use crate::core::interaction::{normalize, probe};
use crate::core::render::{BloomPass, Color, Composer, Node, NodeId, PerspectiveCamera, RenderPass, SceneGraph};
use crate::core::state::{Emitter, ScreenState};

//=== Constants ===========================================================

const CAMERA_FOV: f32 = 70.0;
const CAMERA_NEAR: f32 = 0.01;
const CAMERA_FAR: f32 = 100.0;
const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 4.0, 10.0);

const BLOOM_STRENGTH: f32 = 0.5;
const BLOOM_RADIUS: f32 = 0.2;
const BLOOM_THRESHOLD: f32 = 0.2;

const HOVER_COLOR: Color = Color::YELLOW;
const IDLE_COLOR: Color = Color::WHITE;

//=== Car =================================================================

/// The loaded car: its root node and the mesh nodes that carry materials.
#[derive(Debug, Clone)]
struct Car {
    root: NodeId,
    parts: Vec<NodeId>,
}

//=== GameState ===========================================================

pub struct GameState {
    graph: SceneGraph,
    camera: PerspectiveCamera,
    composer: Option<Composer>,
    animation: Box<dyn AnimationService>,

    car: Option<Car>,
    startup_sound: Option<Sound>,
    engine_sound: Option<Sound>,

    registered: bool,
    deliveries: Option<Receiver<Arc<AssetBundle>>>,
    bundle: Option<Arc<AssetBundle>>,
    /// `bundle` has been placed in the current scene.
    placed: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_animation(Box::new(Tweens::new()))
    }

    /// Uses `animation` instead of the default [`Tweens`].
    pub fn with_animation(animation: Box<dyn AnimationService>) -> Self {
        let mut camera = PerspectiveCamera::new(CAMERA_FOV, 1.0, CAMERA_NEAR, CAMERA_FAR).with_position(CAMERA_POSITION);
        camera.look_at(Vec3::ZERO);

        Self {
            graph: SceneGraph::new(),
            camera,
            composer: None,
            animation,
            car: None,
            startup_sound: None,
            engine_sound: None,
            registered: false,
            deliveries: None,
            bundle: None,
            placed: false,
        }
    }

    //--- Introspection ----------------------------------------------------

    /// Whether the car model has been placed in the scene.
    pub fn is_loaded(&self) -> bool {
        self.car.is_some()
    }

    pub fn is_engine_playing(&self) -> bool {
        self.engine_sound.is_playing()
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    //--- Asset Handling ---------------------------------------------------

    /// Places the delivered bundle in the scene, if one has arrived.
    fn adopt_assets(&mut self, audio: &AudioListener) {
        if let Some(deliveries) = &self.deliveries {
            match deliveries.try_recv() {
                Ok(bundle) => {
                    self.bundle = Some(bundle);
                    self.deliveries = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => self.deliveries = None,
            }
        }

        if self.placed {
            return;
        }
        if let Some(bundle) = self.bundle.clone() {
            self.placed = true;
            self.load(&bundle, audio);
        }
    }

    fn load(&mut self, bundle: &AssetBundle, audio: &AudioListener) {
        //--- Car ----------------------------------------------------------
        match (bundle.model(CAR_MODEL), bundle.texture(CAR_TEXTURE)) {
            (Ok(model), Ok(texture)) => {
                let root = self.graph.instantiate(&model);
                let parts = self.graph.material_nodes(root);
                for &part in &parts {
                    if let Some(material) = self.graph.material_mut(part) {
                        material.map = Some(Arc::clone(&texture));
                    }
                }

                if let Some(transform) = self.graph.transform_mut(root) {
                    transform.rotation.y = -1.0;
                }

                self.animation.add(
                    Tween::new(root, Property::RotationY, -1.0, 1.0, 10.0)
                        .with_easing(Easing::QuadInOut)
                        .with_yoyo(true)
                        .with_repeat(Repeat::Forever),
                );
                self.animation.add(
                    Tween::new(root, Property::ScaleY, 1.0, 1.05, 0.1)
                        .with_yoyo(true)
                        .with_repeat(Repeat::Forever),
                );

                debug!("Showroom: car placed ({} parts)", parts.len());
                self.car = Some(Car { root, parts });
            }
            (Err(e), _) | (_, Err(e)) => error!("Showroom: car unavailable: {}", e),
        }

        //--- Sounds -------------------------------------------------------
        self.startup_sound = match bundle.sound(CAR_STARTUP_SOUND) {
            Ok(buffer) => Some(audio.sound(buffer)),
            Err(e) => {
                error!("Showroom: {}", e);
                None
            }
        };

        self.engine_sound = match bundle.sound(CAR_ENGINE_SOUND) {
            Ok(buffer) => {
                let mut sound = audio.sound(buffer);
                sound.set_loop(true);
                Some(sound)
            }
            Err(e) => {
                error!("Showroom: {}", e);
                None
            }
        };
    }

    //--- Interaction ------------------------------------------------------

    /// Highlights the car under the pointer. Returns whether it is hovered.
    fn hover(&mut self, context: &GlobalContext) -> bool {
        let Some(car) = &self.car else { return false };

        let cursor = normalize(context.input.cursor_position(), context.viewport());
        let hovered = !probe(cursor, &self.camera, &self.graph, car.root).is_empty();
        let color = if hovered { HOVER_COLOR } else { IDLE_COLOR };

        for &part in &car.parts {
            if let Some(material) = self.graph.material_mut(part) {
                material.color = color;
            }
        }

        hovered
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

//=== ScreenState Implementation ==========================================

impl ScreenState<ShowroomEvent> for GameState {
    fn construct(&mut self, context: &GlobalContext) {
        let viewport = context.viewport();

        self.graph.add(Node::ambient_light(Color::WHITE, 1.0));
        self.camera.aspect = viewport.aspect();

        let mut composer = Composer::new(Arc::clone(&context.surface));
        composer.add_pass(RenderPass::new());
        composer.add_pass(BloomPass::new(viewport, BLOOM_STRENGTH, BLOOM_RADIUS, BLOOM_THRESHOLD));
        self.composer = Some(composer);

        if !self.registered {
            self.registered = true;
            let (tx, rx) = bounded(1);
            context.assets.on_ready(move |bundle| {
                // Receiver gone means the state was dropped first
                let _ = tx.send(Arc::clone(bundle));
            });
            self.deliveries = Some(rx);
        }

        debug!("Showroom constructed ({}x{})", viewport.width, viewport.height);
    }

    fn enter(&mut self, context: &GlobalContext) {
        self.adopt_assets(&context.audio);

        self.animation.restart_all();
        self.startup_sound.play();
        self.engine_sound.play();
    }

    fn update(&mut self, context: &GlobalContext, emit: &mut Emitter<ShowroomEvent>) {
        self.adopt_assets(&context.audio);

        self.animation.advance(context.time.delta, &mut self.graph);

        let viewport = context.viewport();
        self.camera.aspect = viewport.aspect();
        if let Some(composer) = &mut self.composer {
            composer.set_size(viewport);
        }

        if self.hover(context) && context.input.is_button_clicked(MouseButton::Left) {
            trace!("Showroom: car clicked");
            emit.emit(ShowroomEvent::GameEnded);
        }

        if let Some(composer) = &mut self.composer {
            composer.render(&self.graph, &self.camera);
        }
    }

    fn exit(&mut self, _context: &GlobalContext) {
        self.startup_sound.stop();
        self.engine_sound.stop();
    }

    fn dispose(&mut self, _context: &GlobalContext) {
        self.startup_sound.stop();
        self.engine_sound.stop();
        self.startup_sound = None;
        self.engine_sound = None;

        self.animation.clear();
        self.graph.clear();
        self.car = None;
        self.composer = None;
        self.placed = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use parking_lot::Mutex;

    use super::*;
    use crate::core::assets::AssetGate;
    use crate::core::audio::AudioCmd;
    use crate::core::input::InputEvent;
    use crate::core::render::{surface, Effect, HeadlessTarget, RenderTarget, SurfaceHandle, Viewport};
    use crate::showroom::ProceduralAssets;

    const VIEW: Viewport = Viewport::new(800.0, 600.0);
    const DT: f32 = 1.0 / 60.0;

    fn ready_context() -> GlobalContext {
        let ctx = GlobalContext::headless(VIEW);
        ctx.assets.fire(Arc::new(ProceduralAssets::bundle()));
        ctx
    }

    fn frame(ctx: &mut GlobalContext, events: Vec<InputEvent>) {
        ctx.begin_frame(&[events], DT);
    }

    fn pointer_at(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    fn left_click() -> InputEvent {
        InputEvent::MouseButtonDown {
            button: MouseButton::Left,
        }
    }

    fn car_color(state: &GameState) -> Color {
        let car = state.car.as_ref().unwrap();
        match &state.graph.node(car.parts[0]).unwrap().kind {
            crate::core::render::NodeKind::Mesh(mesh) => mesh.material.color,
            other => panic!("expected mesh, got {:?}", other),
        }
    }

    //=====================================================================
    // Construction
    //=====================================================================

    #[test]
    fn construct_builds_scene_and_pipeline() {
        let ctx = GlobalContext::headless(VIEW);
        let mut state = GameState::new();

        state.construct(&ctx);

        assert_eq!(state.graph.len(), 1, "Only the ambient light before assets");
        assert_eq!(state.composer.as_ref().unwrap().pass_names(), vec!["render", "bloom"]);
        assert_relative_eq!(state.camera.aspect, VIEW.aspect());
        assert_eq!(ctx.assets.pending_count(), 1);
    }

    #[test]
    fn construct_after_fire_loads_on_first_update() {
        let mut ctx = ready_context();
        let mut state = GameState::new();

        state.construct(&ctx);
        assert!(!state.is_loaded());

        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());
        assert!(state.is_loaded());
    }

    #[test]
    fn loaded_parts_are_textured() {
        let mut ctx = ready_context();
        let mut state = GameState::new();
        state.construct(&ctx);
        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());

        let car = state.car.as_ref().unwrap();
        assert_eq!(car.parts.len(), 6);
        for &part in &car.parts {
            match &state.graph.node(part).unwrap().kind {
                crate::core::render::NodeKind::Mesh(mesh) => assert!(mesh.material.map.is_some()),
                other => panic!("expected mesh, got {:?}", other),
            }
        }
    }

    //=====================================================================
    // Interaction
    //=====================================================================

    #[test]
    fn hover_highlights_and_click_emits_game_ended() {
        let mut ctx = ready_context();
        let mut state = GameState::new();
        state.construct(&ctx);
        state.enter(&ctx);

        frame(&mut ctx, vec![pointer_at(400.0, 300.0)]);
        let mut emit = Emitter::new();
        state.update(&ctx, &mut emit);
        assert_eq!(car_color(&state), HOVER_COLOR);
        assert_eq!(emit.event(), None);

        frame(&mut ctx, vec![left_click()]);
        let mut emit = Emitter::new();
        state.update(&ctx, &mut emit);
        assert_eq!(emit.event(), Some(ShowroomEvent::GameEnded));
    }

    #[test]
    fn click_off_the_car_does_nothing() {
        let mut ctx = ready_context();
        let mut state = GameState::new();
        state.construct(&ctx);

        frame(&mut ctx, vec![pointer_at(0.0, 0.0), left_click()]);
        let mut emit = Emitter::new();
        state.update(&ctx, &mut emit);

        assert_eq!(car_color(&state), IDLE_COLOR);
        assert_eq!(emit.event(), None);
    }

    #[test]
    fn click_without_assets_never_emits() {
        let mut ctx = GlobalContext::headless(VIEW);
        let mut state = GameState::new();
        state.construct(&ctx);

        frame(&mut ctx, vec![pointer_at(400.0, 300.0), left_click()]);
        let mut emit = Emitter::new();
        state.update(&ctx, &mut emit);

        assert_eq!(emit.event(), None);
    }

    //=====================================================================
    // Animation and Audio
    //=====================================================================

    #[test]
    fn rotation_tween_drives_the_car() {
        let mut ctx = ready_context();
        let mut state = GameState::new();
        state.construct(&ctx);
        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());

        for _ in 0..300 {
            frame(&mut ctx, Vec::new());
            state.update(&ctx, &mut Emitter::new());
        }

        let root = state.car.as_ref().unwrap().root;
        let rotation = state.graph.node(root).unwrap().transform.rotation.y;
        assert!(rotation > -1.0 && rotation < 1.0, "rotation {} should be mid-sweep", rotation);
    }

    #[test]
    fn enter_plays_and_exit_stops_engine() {
        let mut ctx = ready_context();
        let mut state = GameState::new();
        state.construct(&ctx);
        frame(&mut ctx, Vec::new());

        state.enter(&ctx);
        assert!(state.is_engine_playing());
        assert!(state.engine_sound.as_ref().unwrap().buffer().name == CAR_ENGINE_SOUND);

        state.exit(&ctx);
        assert!(!state.is_engine_playing());

        state.enter(&ctx);
        assert!(state.is_engine_playing());
    }

    #[test]
    fn exit_after_loading_without_enter_plays_nothing() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut ctx = GlobalContext::new(surface(HeadlessTarget::new(VIEW)), Arc::new(AssetGate::new()), AudioListener::new(tx));
        ctx.assets.fire(Arc::new(ProceduralAssets::bundle()));

        let mut state = GameState::new();
        state.construct(&ctx);
        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());
        assert!(state.startup_sound.is_some() && state.engine_sound.is_some());

        state.exit(&ctx);

        assert!(!state.is_engine_playing());
        assert!(!rx.try_iter().any(|cmd| matches!(cmd, AudioCmd::Play { .. })));
    }

    #[test]
    fn dispose_cycles_keep_a_single_gate_registration() {
        let mut ctx = GlobalContext::headless(VIEW);
        let mut state = GameState::new();

        for _ in 0..50 {
            state.construct(&ctx);
            state.enter(&ctx);
            state.exit(&ctx);
            state.dispose(&ctx);
        }
        assert_eq!(ctx.assets.pending_count(), 1);

        ctx.assets.fire(Arc::new(ProceduralAssets::bundle()));
        state.construct(&ctx);
        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());
        assert!(state.is_loaded());
    }

    #[test]
    fn bloom_follows_surface_resize() {
        let target = Arc::new(Mutex::new(HeadlessTarget::new(VIEW)));
        let handle: SurfaceHandle = target.clone();
        let mut ctx = GlobalContext::new(handle, Arc::new(AssetGate::new()), AudioListener::silent());
        let mut state = GameState::new();
        state.construct(&ctx);

        target.lock().resize(Viewport::new(1280.0, 720.0));
        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());

        match target.lock().last_effects() {
            [Effect::Bloom { width, height, .. }] => assert_eq!((*width, *height), (1280.0, 720.0)),
            other => panic!("expected one bloom effect, got {:?}", other),
        }
        assert_relative_eq!(state.camera.aspect, 1280.0 / 720.0);
    }

    #[test]
    fn exit_without_enter_is_safe() {
        let ctx = GlobalContext::headless(VIEW);
        let mut state = GameState::new();
        state.exit(&ctx);
        state.construct(&ctx);
        state.exit(&ctx);
        assert!(!state.is_engine_playing());
    }

    #[test]
    fn dispose_then_construct_reloads() {
        let mut ctx = ready_context();
        let mut state = GameState::new();
        state.construct(&ctx);
        state.enter(&ctx);
        state.exit(&ctx);

        state.dispose(&ctx);
        assert!(!state.is_loaded());
        assert!(state.graph.is_empty());

        state.construct(&ctx);
        frame(&mut ctx, Vec::new());
        state.update(&ctx, &mut Emitter::new());
        assert!(state.is_loaded());
    }
}
