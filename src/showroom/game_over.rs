//=========================================================================
// Showroom Game Over State
//=========================================================================
//
// A dim banner shown after the car is clicked. Any left click restarts.
//
//=========================================================================

use std::sync::Arc;

use glam::Vec3;
use log::debug;

use super::ShowroomEvent;
use crate::core::globals::GlobalContext;
use crate::core::input::MouseButton;
use crate::core::render::{Color, Composer, Geometry, Material, Node, PerspectiveCamera, RenderPass, SceneGraph};
use crate::core::state::{Emitter, ScreenState};

const BANNER_COLOR: Color = Color::rgb(0.8, 0.1, 0.1);

//=== GameOverState =======================================================

pub struct GameOverState {
    graph: SceneGraph,
    camera: PerspectiveCamera,
    composer: Option<Composer>,
}

impl GameOverState {
    pub fn new() -> Self {
        let mut camera = PerspectiveCamera::new(50.0, 1.0, 0.1, 10.0).with_position(Vec3::new(0.0, 0.0, 3.0));
        camera.look_at(Vec3::ZERO);

        Self {
            graph: SceneGraph::new(),
            camera,
            composer: None,
        }
    }
}

impl Default for GameOverState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenState<ShowroomEvent> for GameOverState {
    fn construct(&mut self, context: &GlobalContext) {
        self.graph.add(Node::ambient_light(Color::WHITE, 0.3));
        self.graph.add(Node::mesh(
            "banner",
            Some(Arc::new(Geometry::plane(2.0, 0.5))),
            Material::with_color(BANNER_COLOR),
        ));
        self.camera.aspect = context.viewport().aspect();

        let mut composer = Composer::new(Arc::clone(&context.surface));
        composer.add_pass(RenderPass::new());
        self.composer = Some(composer);
    }

    fn enter(&mut self, _context: &GlobalContext) {
        debug!("Game over");
    }

    fn update(&mut self, context: &GlobalContext, emit: &mut Emitter<ShowroomEvent>) {
        self.camera.aspect = context.viewport().aspect();

        if context.input.is_button_clicked(MouseButton::Left) {
            emit.emit(ShowroomEvent::Restart);
        }

        if let Some(composer) = &mut self.composer {
            composer.render(&self.graph, &self.camera);
        }
    }

    fn dispose(&mut self, _context: &GlobalContext) {
        self.graph.clear();
        self.composer = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
