//! Entity management for cell visuals: spawning/despawning to mirror the
//! cell array, and pushing positions and opacities into the render world.

use std::sync::Arc;

use bevy::prelude::*;
use bevy::utils::HashMap;

use crate::drag::ActiveDrag;
use crate::scroll::{GridFrame, ScrollState};
use crate::state::{GridItem, GridState};
use crate::{GridConfig, LockedCells};

/// Anchor entity all cell visuals hang off.
#[derive(Component)]
pub struct GridRoot;

/// One spawned visual per live cell, resolved by identity key.
#[derive(Component, Debug)]
pub struct CellVisual {
    pub key: String,
}

/// Key to entity map for the spawned visuals.
#[derive(Resource, Debug, Default)]
pub struct CellEntities(pub HashMap<String, Entity>);

type RenderFn<I> = dyn Fn(&mut ChildBuilder, &I, usize) + Send + Sync;

/// Builds the visual content of a cell. The closure spawns children under the
/// cell's root entity; the root's transform and opacity are driven by the
/// grid, not by the closure.
#[derive(Resource, Clone)]
pub struct CellRenderer<I: GridItem>(pub Arc<RenderFn<I>>);

/// Optional variant used for cells the lock predicate matches. Falls back to
/// [`CellRenderer`] when unset.
#[derive(Resource, Clone)]
pub struct LockedCellRenderer<I: GridItem>(pub Option<Arc<RenderFn<I>>>);

impl<I: GridItem> Default for LockedCellRenderer<I> {
    fn default() -> Self {
        Self(None)
    }
}

impl<I: GridItem> Default for CellRenderer<I> {
    fn default() -> Self {
        Self(Arc::new(|parent, item, _index| {
            parent.spawn((
                Sprite::from_color(Color::srgb(0.35, 0.35, 0.4), Vec2::splat(64.0)),
                Transform::default(),
            ));
            parent.spawn((
                Text2d::new(item.key()),
                TextFont::from_font_size(20.0),
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, 0.0, 0.1),
            ));
        }))
    }
}

pub(crate) fn spawn_grid_root(mut commands: Commands) {
    commands.spawn((GridRoot, Transform::default(), Visibility::default()));
}

/// Spawns visuals for new cells and despawns visuals whose cell is gone.
/// Runs after the animation driver so a fading delete keeps its visual until
/// the staged commit removes the cell.
pub(crate) fn sync_visuals<I: GridItem>(
    mut commands: Commands,
    state: Res<GridState<I>>,
    locked: Res<LockedCells<I>>,
    renderer: Res<CellRenderer<I>>,
    locked_renderer: Res<LockedCellRenderer<I>>,
    roots: Query<Entity, With<GridRoot>>,
    mut entities: ResMut<CellEntities>,
) {
    let Ok(root) = roots.get_single() else {
        return;
    };

    for (index, cell) in state.cells.iter().enumerate() {
        if entities.0.contains_key(&cell.key) {
            continue;
        }
        let render: &Arc<RenderFn<I>> = if locked.check(&cell.item, index) {
            locked_renderer.0.as_ref().unwrap_or(&renderer.0)
        } else {
            &renderer.0
        };
        let mut entity = commands.spawn((
            CellVisual {
                key: cell.key.clone(),
            },
            Transform::default(),
            Visibility::default(),
        ));
        entity.with_children(|parent| render(parent, &cell.item, index));
        let id = entity.id();
        commands.entity(root).add_child(id);
        entities.0.insert(cell.key.clone(), id);
    }

    let stale: Vec<String> = entities
        .0
        .keys()
        .filter(|key| state.index_of_key(key).is_none())
        .cloned()
        .collect();
    for key in stale {
        if let Some(entity) = entities.0.remove(&key) {
            commands.entity(entity).despawn_recursive();
        }
    }
}

/// Writes each cell's engine position into its visual's transform. The
/// dragged cell floats above its neighbors and carries the selected scale.
pub(crate) fn apply_cell_transforms<I: GridItem>(
    state: Res<GridState<I>>,
    frame: Res<GridFrame>,
    scroll: Res<ScrollState>,
    config: Res<GridConfig>,
    drag: Res<ActiveDrag>,
    entities: Res<CellEntities>,
    mut transforms: Query<&mut Transform, With<CellVisual>>,
) {
    let dragged = drag.dragged_key();
    for cell in &state.cells {
        let Some(&entity) = entities.0.get(&cell.key) else {
            continue;
        };
        let Ok(mut transform) = transforms.get_mut(entity) else {
            continue;
        };
        let world = frame.content_to_world(cell.pos, state.cell_size, scroll.offset);
        let lifted = dragged == Some(cell.key.as_str());
        transform.translation = world.extend(if lifted { 1.0 } else { 0.0 });
        let scale = if lifted { config.selected_scale } else { 1.0 };
        transform.scale = Vec3::splat(scale);
    }
}

/// Pushes each cell's opacity onto every sprite and text in its visual tree.
pub(crate) fn apply_opacity<I: GridItem>(
    state: Res<GridState<I>>,
    entities: Res<CellEntities>,
    children: Query<&Children>,
    mut sprites: Query<&mut Sprite>,
    mut texts: Query<&mut TextColor>,
) {
    for cell in &state.cells {
        let Some(&entity) = entities.0.get(&cell.key) else {
            continue;
        };
        for descendant in children.iter_descendants(entity) {
            if let Ok(mut sprite) = sprites.get_mut(descendant) {
                sprite.color.set_alpha(cell.opacity);
            }
            if let Ok(mut text) = texts.get_mut(descendant) {
                text.0.set_alpha(cell.opacity);
            }
        }
    }
}
