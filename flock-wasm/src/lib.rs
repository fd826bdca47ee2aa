use flock_core::{
    Agent, Behavior, Command, FlockConfig, IdleMode, PaintMark, PointerTracker, Region, Shape,
    StrokeRecorder, Variant, Vector2D, World,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

const BOID_SIZE: f64 = 10.0;
const BEE_RADIUS: f64 = 5.0;
const PAINT_RADIUS: f64 = 2.0;
const MAX_PAINT: usize = 20_000;

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Maps a control button name to the command it sends. `center` is the
/// world center shapes are laid out around; `stroke` the recorded drawing.
pub fn button_command(name: &str, center: Vector2D, stroke: &[Vector2D]) -> Option<Command> {
    match name {
        "toggle-attraction" => Some(Command::ToggleBehavior(Behavior::Attraction)),
        "toggle-painting" => Some(Command::ToggleBehavior(Behavior::Painting)),
        "form-letter-t" => Some(Command::FormShape(Shape::letter_t(center))),
        "form-pathway" => Some(Command::FormShape(Shape::pathway(center))),
        "form-stroke" => Some(Command::FormShape(Shape::Custom {
            points: stroke.to_vec(),
        })),
        "scatter" => Some(Command::Scatter),
        _ => None,
    }
}

/// Where a drag inside the device pulls the flock: the pointer, led by its
/// last move. `None` when not dragging.
pub fn drag_target(pointer: &PointerTracker) -> Option<Vector2D> {
    pointer
        .is_down()
        .then(|| pointer.position() + pointer.drag_velocity())
}

#[wasm_bindgen]
pub struct FlockSimulation {
    world: World,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    pointer: PointerTracker,
    stroke: StrokeRecorder,
    paint: Vec<PaintMark>,
}

#[wasm_bindgen]
impl FlockSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        width: f64,
        height: f64,
        agent_count: usize,
        variant: &str,
    ) -> Result<FlockSimulation, JsValue> {
        let variant: Variant = variant.parse().map_err(to_js)?;
        console_log!(
            "Initializing {:?} simulation with {} agents",
            variant,
            agent_count
        );

        let window = web_sys::window().ok_or("no global window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or("canvas not found")?
            .dyn_into::<HtmlCanvasElement>()?;

        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let context = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let mut world = World::new(width as f32, height as f32, FlockConfig::preset(variant))
            .map_err(to_js)?;
        world.populate(agent_count);

        Ok(FlockSimulation {
            world,
            canvas,
            context,
            pointer: PointerTracker::new(),
            stroke: StrokeRecorder::new(),
            paint: Vec::new(),
        })
    }

    pub fn update(&mut self) {
        self.world.update();
        self.paint.extend(self.world.take_paint_marks());
        if self.paint.len() > MAX_PAINT {
            let excess = self.paint.len() - MAX_PAINT;
            self.paint.drain(..excess);
        }
    }

    pub fn render(&self) -> Result<(), JsValue> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;
        self.context.clear_rect(0.0, 0.0, width, height);

        if let Some(region) = self.world.containment() {
            self.draw_region(&region);
        } else if self.world.flags().painting {
            self.draw_region(&self.world.paint_region());
        }

        for mark in &self.paint {
            self.context.begin_path();
            self.context.arc(
                mark.position.x as f64,
                mark.position.y as f64,
                PAINT_RADIUS,
                0.0,
                std::f64::consts::TAU,
            )?;
            self.context.set_fill_style_str(&mark.color.to_string());
            self.context.fill();
        }

        self.draw_stroke();

        let as_bees = self.world.config().idle_mode == IdleMode::Orbit;
        for agent in self.world.agents() {
            if as_bees {
                self.draw_bee(agent)?;
            } else {
                self.draw_boid(agent);
            }
        }

        Ok(())
    }

    fn draw_region(&self, region: &Region) {
        self.context.set_fill_style_str("green");
        self.context.set_stroke_style_str("black");
        for part in region.parts() {
            self.context.begin_path();
            self.context.rect(
                part.left as f64,
                part.top as f64,
                part.width() as f64,
                part.height() as f64,
            );
            self.context.fill();
            self.context.stroke();
        }
    }

    fn draw_stroke(&self) {
        self.context.set_stroke_style_str("black");
        self.context.set_line_width(1.0);
        for segment in self.stroke.segments() {
            self.context.begin_path();
            self.context
                .move_to(segment.start.x as f64, segment.start.y as f64);
            self.context.line_to(segment.end.x as f64, segment.end.y as f64);
            self.context.stroke();
        }
    }

    fn draw_boid(&self, agent: &Agent) {
        let [tip, left, right] = agent.triangle(BOID_SIZE as f32);

        self.context.begin_path();
        self.context.move_to(tip.x as f64, tip.y as f64);
        self.context.line_to(left.x as f64, left.y as f64);
        self.context.line_to(right.x as f64, right.y as f64);
        self.context.close_path();

        self.context.set_fill_style_str(&agent.color.to_string());
        self.context.fill();
    }

    fn draw_bee(&self, agent: &Agent) -> Result<(), JsValue> {
        self.context.begin_path();
        self.context.arc(
            agent.position.x as f64,
            agent.position.y as f64,
            BEE_RADIUS,
            0.0,
            std::f64::consts::TAU,
        )?;
        self.context.set_fill_style_str(&agent.color.to_string());
        self.context.fill();
        Ok(())
    }

    fn event_position(&self, event: &MouseEvent) -> Vector2D {
        let canvas_element: &Element = self.canvas.as_ref();
        let rect = canvas_element.get_bounding_client_rect();
        Vector2D::new(
            (event.client_x() as f64 - rect.left()) as f32,
            (event.client_y() as f64 - rect.top()) as f32,
        )
    }

    pub fn handle_mouse_move(&mut self, event: MouseEvent) {
        let at = self.event_position(&event);
        self.pointer.move_to(at);
        self.world.pointer_moved(at);
        if let Some(target) = drag_target(&self.pointer) {
            self.world.set_target(Some(target));
        }
        self.stroke.extend(at, js_sys::Date::now());
    }

    /// Pressing inside the device drags the flock along; anywhere else
    /// starts a stroke.
    pub fn handle_mouse_down(&mut self, event: MouseEvent) {
        let at = self.event_position(&event);
        self.pointer.move_to(at);
        let region = self.world.paint_region();
        if self.pointer.press(at, &region) {
            self.world.set_target(Some(at));
        } else {
            self.stroke.begin(at, js_sys::Date::now());
        }
    }

    pub fn handle_mouse_up(&mut self) {
        if self.pointer.is_down() {
            self.world.set_target(None);
        }
        self.pointer.release();
        self.stroke.end();
    }

    pub fn handle_mouse_leave(&mut self) {
        self.handle_mouse_up();
        self.world.send(Command::PointerLeft);
    }

    /// Handles a control button; returns false for unknown names.
    pub fn press_button(&mut self, name: &str) -> bool {
        if name == "clear-stroke" {
            self.stroke.clear();
            return true;
        }
        let points = self.stroke.points();
        match button_command(name, self.world.center(), &points) {
            Some(command) => {
                console_log!("Button {}", name);
                self.world.send(command);
                true
            }
            None => {
                console_log!("Unknown button {}", name);
                false
            }
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        self.world.resize(width as f32, height as f32);
        console_log!("Resized to {}x{}", width, height);
    }

    pub fn agent_count(&self) -> usize {
        self.world.len()
    }

    pub fn set_max_speed(&mut self, speed: f32) -> Result<(), JsValue> {
        self.update_config(|c| c.max_speed = speed)
    }

    pub fn set_cohesion_strength(&mut self, strength: f32) -> Result<(), JsValue> {
        self.update_config(|c| c.cohesion_strength = strength)
    }

    pub fn set_separation_strength(&mut self, strength: f32) -> Result<(), JsValue> {
        self.update_config(|c| c.separation_strength = strength)
    }

    pub fn set_perception_radius(&mut self, radius: f32) -> Result<(), JsValue> {
        self.update_config(|c| c.perception_radius = radius)
    }

    fn update_config(&mut self, edit: impl FnOnce(&mut FlockConfig)) -> Result<(), JsValue> {
        let mut config = *self.world.config();
        edit(&mut config);
        self.world.set_config(config).map_err(to_js)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_commands() {
        let center = Vector2D::new(400.0, 300.0);
        assert_eq!(
            button_command("toggle-attraction", center, &[]),
            Some(Command::ToggleBehavior(Behavior::Attraction))
        );
        assert_eq!(
            button_command("form-pathway", center, &[]),
            Some(Command::FormShape(Shape::pathway(center)))
        );
        let stroke = [Vector2D::new(1.0, 2.0)];
        assert_eq!(
            button_command("form-stroke", center, &stroke),
            Some(Command::FormShape(Shape::Custom {
                points: stroke.to_vec()
            }))
        );
        assert_eq!(button_command("launch", center, &[]), None);
    }

    #[test]
    fn test_drag_target_leads_the_pointer() {
        let device = Region::rect(flock_core::Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut pointer = PointerTracker::new();
        pointer.move_to(Vector2D::new(10.0, 10.0));
        assert_eq!(drag_target(&pointer), None);

        assert!(pointer.press(Vector2D::new(10.0, 10.0), &device));
        pointer.move_to(Vector2D::new(14.0, 13.0));
        assert_eq!(drag_target(&pointer), Some(Vector2D::new(18.0, 16.0)));

        pointer.release();
        assert_eq!(drag_target(&pointer), None);
    }
}
