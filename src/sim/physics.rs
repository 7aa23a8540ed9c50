//! Rigid body world
//!
//! Bodies live in a generation-checked slot arena and are addressed by
//! [`BodyHandle`]. A removed body's slot may be reused, but its generation is bumped
//! so an old handle never resolves again.
//!
//! Each `update` runs fixed sub-steps: integrate dynamic bodies, resolve contacts,
//! then diff the active contact set against the previous sub-step to emit
//! begin/end events and maintain grounded state.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;

use super::collision;
use crate::clamp_per_axis;
use crate::error::{SimError, SimResult};
use crate::settings::PhysicsSettings;

/// Opaque handle to a body owned by the [`PhysicsEngine`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Collider shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box
    Box { size: Vec2 },
    /// Horizontal capsule used for terrain
    Segment { width: f32, half_thickness: f32 },
}

impl Shape {
    /// Bounding box size
    pub fn extent(&self) -> Vec2 {
        match *self {
            Shape::Box { size } => size,
            Shape::Segment {
                width,
                half_thickness,
            } => Vec2::new(width, half_thickness * 2.0),
        }
    }
}

/// Collision category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Dynamic,
    Ground,
}

/// A simulated body. `position` is the top-left corner of its bounding box.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Finite for dynamic bodies, infinite for static ones
    pub mass: f32,
    pub shape: Shape,
    pub category: Category,
    force: Vec2,
    grounded_by: Option<BodyHandle>,
}

impl Body {
    pub(crate) fn dynamic(position: Vec2, size: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass,
            shape: Shape::Box { size },
            category: Category::Dynamic,
            force: Vec2::ZERO,
            grounded_by: None,
        }
    }

    pub(crate) fn fixed(position: Vec2, shape: Shape) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: f32::INFINITY,
            shape,
            category: Category::Ground,
            force: Vec2::ZERO,
            grounded_by: None,
        }
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.category == Category::Dynamic
    }

    #[inline]
    pub fn inverse_mass(&self) -> f32 {
        if self.is_dynamic() { 1.0 / self.mass } else { 0.0 }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded_by.is_some()
    }

    /// The static body whose contact currently grounds this one
    pub fn grounded_by(&self) -> Option<BodyHandle> {
        self.grounded_by
    }
}

/// Contact transitions produced by the last `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    Began { body: BodyHandle, other: BodyHandle },
    Ended { body: BodyHandle, other: BodyHandle },
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<Body>,
}

/// Active contacts keyed by (dynamic body, other body), valued by whether the
/// contact supports the body against gravity
type ContactSet = BTreeMap<(BodyHandle, BodyHandle), bool>;

/// Owns every body and steps the simulation
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    settings: PhysicsSettings,
    gravity: Vec2,
    slots: Vec<Slot>,
    free: Vec<u32>,
    contacts: ContactSet,
    events: Vec<ContactEvent>,
}

impl PhysicsEngine {
    pub fn new(settings: &PhysicsSettings) -> Self {
        Self {
            settings: settings.clone(),
            gravity: Vec2::new(0.0, settings.gravity),
            slots: Vec::new(),
            free: Vec::new(),
            contacts: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Create a dynamic box. Mass must be finite and positive.
    pub fn create_dynamic_body(
        &mut self,
        position: Vec2,
        size: Vec2,
        mass: f32,
    ) -> SimResult<BodyHandle> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimError::InvalidMass { mass });
        }
        check_extent(size)?;
        Ok(self.insert(Body::dynamic(position, size, mass)))
    }

    /// Create an immovable box
    pub fn create_static_body(&mut self, position: Vec2, size: Vec2) -> SimResult<BodyHandle> {
        check_extent(size)?;
        Ok(self.insert(Body::fixed(position, Shape::Box { size })))
    }

    /// Create an immovable horizontal segment (capsule) for terrain
    pub fn create_ground_segment(
        &mut self,
        position: Vec2,
        width: f32,
        thickness: f32,
    ) -> SimResult<BodyHandle> {
        check_extent(Vec2::new(width, thickness))?;
        let shape = Shape::Segment {
            width,
            half_thickness: thickness * 0.5,
        };
        Ok(self.insert(Body::fixed(position, shape)))
    }

    fn insert(&mut self, body: Body) -> BodyHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            BodyHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                body: Some(body),
            });
            BodyHandle {
                index,
                generation: 0,
            }
        }
    }

    /// Release a body and end every contact it takes part in
    pub fn remove_body(&mut self, handle: BodyHandle) -> SimResult<()> {
        self.body(handle, "remove_body")?;
        let slot = &mut self.slots[handle.index as usize];
        slot.body = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);

        let ended: Vec<_> = self
            .contacts
            .keys()
            .filter(|(body, other)| *body == handle || *other == handle)
            .copied()
            .collect();
        for pair in ended {
            self.contacts.remove(&pair);
            self.end_contact(pair);
        }
        Ok(())
    }

    /// Remove every body and restore the configured gravity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            if slot.body.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.contacts.clear();
        self.events.clear();
        self.gravity = Vec2::new(0.0, self.settings.gravity);
        log::debug!("Physics cleared ({} slots retained)", self.slots.len());
    }

    /// Look up a live body
    pub fn get_body(&self, handle: BodyHandle) -> SimResult<&Body> {
        self.body(handle, "get_body")
    }

    fn body(&self, handle: BodyHandle, context: &'static str) -> SimResult<&Body> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_ref())
            .ok_or(SimError::InvalidHandle { handle, context })
    }

    fn body_mut(&mut self, handle: BodyHandle, context: &'static str) -> SimResult<&mut Body> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.body.as_mut())
            .ok_or(SimError::InvalidHandle { handle, context })
    }

    /// Accumulate a force, applied during every sub-step of the next `update`
    pub fn apply_force(&mut self, handle: BodyHandle, force: Vec2) -> SimResult<()> {
        self.body_mut(handle, "apply_force")?.force += force;
        Ok(())
    }

    /// Set velocity, clamped per axis to the configured maximum
    pub fn set_velocity(&mut self, handle: BodyHandle, velocity: Vec2) -> SimResult<()> {
        let limit = Vec2::splat(self.settings.max_set_speed);
        self.body_mut(handle, "set_velocity")?.velocity = clamp_per_axis(velocity, limit);
        Ok(())
    }

    pub fn get_velocity(&self, handle: BodyHandle) -> SimResult<Vec2> {
        Ok(self.body(handle, "get_velocity")?.velocity)
    }

    pub fn get_position(&self, handle: BodyHandle) -> SimResult<Vec2> {
        Ok(self.body(handle, "get_position")?.position)
    }

    pub fn set_position(&mut self, handle: BodyHandle, position: Vec2) -> SimResult<()> {
        self.body_mut(handle, "set_position")?.position = position;
        Ok(())
    }

    pub fn is_grounded(&self, handle: BodyHandle) -> SimResult<bool> {
        Ok(self.body(handle, "is_grounded")?.is_grounded())
    }

    pub fn gravity(&self) -> Vec2 {
        self.gravity
    }

    /// True while gravity points up (negative y)
    pub fn is_gravity_inverted(&self) -> bool {
        self.gravity.y < 0.0
    }

    /// Negate gravity's vertical component for every body
    pub fn flip_gravity(&mut self) {
        self.gravity.y = -self.gravity.y;
        log::debug!("Gravity flipped to {:?}", self.gravity);
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.body.is_some()).count()
    }

    /// Live bodies in slot order
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.body.as_ref().map(|body| {
                (
                    BodyHandle {
                        index: index as u32,
                        generation: slot.generation,
                    },
                    body,
                )
            })
        })
    }

    /// Contact begin/end events produced by the last `update`
    pub fn contact_events(&self) -> &[ContactEvent] {
        &self.events
    }

    /// Advance the simulation by `delta_time` using fixed sub-steps
    pub fn update(&mut self, delta_time: f32) {
        let step = self.settings.fixed_step;
        let steps = ((delta_time / step) as u32).clamp(1, self.settings.max_substeps);
        self.events.clear();

        for _ in 0..steps {
            self.step(step);
        }

        for slot in &mut self.slots {
            if let Some(body) = slot.body.as_mut() {
                body.force = Vec2::ZERO;
            }
        }
    }

    fn step(&mut self, dt: f32) {
        let limit = Vec2::new(self.settings.max_run_speed, self.settings.max_fall_speed);
        let friction = self.settings.ground_friction.powf(dt);
        let gravity = self.gravity;

        for body in self.slots.iter_mut().filter_map(|slot| slot.body.as_mut()) {
            if !body.is_dynamic() {
                continue;
            }
            body.velocity += (gravity + body.force * body.inverse_mass()) * dt;
            if body.is_grounded() {
                body.velocity.x *= friction;
            }
            body.velocity = clamp_per_axis(body.velocity, limit);
            body.position += body.velocity * dt;
        }

        let current = self.solve_contacts();
        self.diff_contacts(current);

        // Dynamic-vs-dynamic redistribution can exceed the caps
        for body in self.slots.iter_mut().filter_map(|slot| slot.body.as_mut()) {
            if body.is_dynamic() {
                body.velocity = clamp_per_axis(body.velocity, limit);
            }
        }
    }

    /// Detect and resolve every contact, returning the active contact set
    fn solve_contacts(&mut self) -> ContactSet {
        let slop = self.settings.contact_slop;
        let threshold = self.settings.ground_normal_threshold;
        let gravity = self.gravity;

        let (dynamic, fixed): (Vec<_>, Vec<_>) = self
            .bodies()
            .map(|(handle, body)| (handle, body.is_dynamic()))
            .partition(|(_, is_dynamic)| *is_dynamic);
        let dynamic: Vec<BodyHandle> = dynamic.into_iter().map(|(handle, _)| handle).collect();
        let fixed: Vec<BodyHandle> = fixed.into_iter().map(|(handle, _)| handle).collect();

        let mut current = ContactSet::new();
        for (i, &a) in dynamic.iter().enumerate() {
            for &s in &fixed {
                let (Some(mut body), Some(other)) = (self.copy_body(a), self.copy_body(s)) else {
                    continue;
                };
                let result = collision::body_collision(&body, &other, slop);
                if !result.hit {
                    continue;
                }
                collision::resolve_static(&mut body, &result);
                self.write_body(a, body);

                let grounding = result.is_vertical()
                    && collision::is_ground_contact(result.normal, gravity, threshold);
                current.insert((a, s), grounding);
            }

            for &b in &dynamic[i + 1..] {
                let (Some(mut body_a), Some(mut body_b)) = (self.copy_body(a), self.copy_body(b))
                else {
                    continue;
                };
                let result = collision::body_collision(&body_a, &body_b, slop);
                if !result.hit {
                    continue;
                }
                collision::resolve_dynamic(&mut body_a, &mut body_b, &result);
                self.write_body(a, body_a);
                self.write_body(b, body_b);
                current.insert((a, b), false);
            }
        }
        current
    }

    fn copy_body(&self, handle: BodyHandle) -> Option<Body> {
        self.body(handle, "solve_contacts").ok().copied()
    }

    fn write_body(&mut self, handle: BodyHandle, body: Body) {
        if let Ok(slot) = self.body_mut(handle, "solve_contacts") {
            *slot = body;
        }
    }

    /// Compare the new contact set with the previous one
    fn diff_contacts(&mut self, current: ContactSet) {
        let previous = std::mem::replace(&mut self.contacts, current);

        let mut began = Vec::new();
        let mut grounding_started = Vec::new();
        for (&pair, &grounding) in &self.contacts {
            match previous.get(&pair) {
                None => {
                    began.push(pair);
                    if grounding {
                        grounding_started.push(pair);
                    }
                }
                Some(&was_grounding) => {
                    if grounding && !was_grounding {
                        grounding_started.push(pair);
                    }
                }
            }
        }
        let ended: Vec<_> = previous
            .keys()
            .filter(|pair| !self.contacts.contains_key(*pair))
            .copied()
            .collect();

        for (body, other) in began {
            log::trace!("Contact began {} -> {}", body, other);
            self.events.push(ContactEvent::Began { body, other });
        }
        for pair in ended {
            self.end_contact(pair);
        }
        for (body, other) in grounding_started {
            if let Ok(body) = self.body_mut(body, "diff_contacts") {
                body.grounded_by.get_or_insert(other);
            }
        }
    }

    /// Record the end of a contact that is no longer in `self.contacts`
    fn end_contact(&mut self, (body, other): (BodyHandle, BodyHandle)) {
        log::trace!("Contact ended {} -> {}", body, other);
        self.events.push(ContactEvent::Ended { body, other });

        let handover = self
            .contacts
            .iter()
            .find(|&(&(b, o), &grounding)| b == body && o != other && grounding)
            .map(|(&(_, o), _)| o);
        if let Ok(body) = self.body_mut(body, "end_contact") {
            if body.grounded_by == Some(other) {
                body.grounded_by = handover;
            }
        }
    }
}

fn check_extent(size: Vec2) -> SimResult<()> {
    if size.is_finite() && size.x > 0.0 && size.y > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidShape {
            width: size.x,
            height: size.y,
        })
    }
}
