//! Photo-roll demo: a 3-column grid with a locked "+" cell, long-press
//! reordering, and an edit mode where tapping a photo deletes it.

use std::sync::Arc;

use bevy::prelude::*;
use drag_grid::{
    CellPressed, CellRenderer, DragBegin, DragEnd, DragGridPlugin, GridConfig, GridData,
    GridItem, LockedCellRenderer, LockedCells, Margins,
};

const COLUMNS: usize = 3;
const HEADER_HEIGHT: f32 = 60.0;
// 360pt window, 3 columns: 120pt cells with a small gutter
const TILE_SIZE: f32 = 112.0;
const INITIAL_PHOTOS: u32 = 11;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Add,
    Photo { id: u32, hue: u8 },
}

impl GridItem for Entry {
    fn key(&self) -> String {
        match self {
            Self::Add => "+".to_owned(),
            Self::Photo { id, .. } => id.to_string(),
        }
    }
}

#[derive(Resource, Default)]
struct EditMode(bool);

#[derive(Resource)]
struct NextPhotoId(u32);

#[derive(Component)]
struct HeaderText;

fn tile_color(hue: u8) -> Color {
    match hue % 6 {
        0 => Color::srgb(0.86, 0.37, 0.34),
        1 => Color::srgb(0.91, 0.62, 0.28),
        2 => Color::srgb(0.47, 0.72, 0.35),
        3 => Color::srgb(0.27, 0.59, 0.78),
        4 => Color::srgb(0.52, 0.41, 0.76),
        _ => Color::srgb(0.80, 0.45, 0.65),
    }
}

fn render_photo(parent: &mut ChildBuilder, entry: &Entry, _index: usize) {
    let Entry::Photo { id, hue } = entry else {
        return;
    };
    parent.spawn((
        Sprite::from_color(tile_color(*hue), Vec2::splat(TILE_SIZE)),
        Transform::default(),
    ));
    parent.spawn((
        Text2d::new(id.to_string()),
        TextFont::from_font_size(24.0),
        TextColor(Color::WHITE),
        Transform::from_xyz(0.0, 0.0, 0.1),
    ));
}

fn render_add(parent: &mut ChildBuilder, _entry: &Entry, _index: usize) {
    parent.spawn((
        Sprite::from_color(Color::srgb(0.2, 0.2, 0.22), Vec2::splat(TILE_SIZE)),
        Transform::default(),
    ));
    parent.spawn((
        Text2d::new("+"),
        TextFont::from_font_size(48.0),
        TextColor(Color::srgb(0.7, 0.7, 0.7)),
        Transform::from_xyz(0.0, 0.0, 0.1),
    ));
}

fn initial_entries() -> Vec<Entry> {
    let mut entries = vec![Entry::Add];
    entries.extend((0..INITIAL_PHOTOS).map(|id| Entry::Photo {
        id,
        hue: fastrand::u8(..),
    }));
    entries
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
    commands.spawn((
        HeaderText,
        Text2d::new("Long-press a photo to reorder"),
        TextFont::from_font_size(16.0),
        TextColor(Color::WHITE),
        Transform::from_xyz(
            0.0,
            grid_helpers::WINDOW_HEIGHT / 2.0 - HEADER_HEIGHT / 2.0,
            0.0,
        ),
    ));
}

fn enter_edit_on_drag(mut events: EventReader<DragBegin>, mut edit: ResMut<EditMode>) {
    if !events.is_empty() {
        events.clear();
        edit.0 = true;
    }
}

fn handle_taps(
    mut events: EventReader<CellPressed<Entry>>,
    mut data: ResMut<GridData<Entry>>,
    mut edit: ResMut<EditMode>,
    mut next_id: ResMut<NextPhotoId>,
) {
    for event in events.read() {
        match (&event.item, edit.0) {
            (Entry::Add, false) => {
                let id = next_id.0;
                next_id.0 += 1;
                let photo = Entry::Photo {
                    id,
                    hue: fastrand::u8(..),
                };
                // new photos land right after the "+" cell
                let at = 1.min(data.0.len());
                data.0.insert(at, photo);
            }
            (Entry::Add, true) => edit.0 = false,
            (entry @ Entry::Photo { .. }, true) => {
                let key = entry.key();
                data.0.retain(|e| e.key() != key);
            }
            (Entry::Photo { .. }, false) => {}
        }
    }
}

fn commit_order(mut events: EventReader<DragEnd<Entry>>, mut data: ResMut<GridData<Entry>>) {
    if let Some(event) = events.read().last() {
        data.0 = event.order.clone();
    }
}

fn exit_edit_on_escape(keys: Res<ButtonInput<KeyCode>>, mut edit: ResMut<EditMode>) {
    if keys.just_pressed(KeyCode::Escape) {
        edit.0 = false;
    }
}

fn update_header(edit: Res<EditMode>, mut headers: Query<&mut Text2d, With<HeaderText>>) {
    if !edit.is_changed() {
        return;
    }
    for mut text in &mut headers {
        text.0 = if edit.0 {
            "Tap a photo to delete, tap + when done".to_owned()
        } else {
            "Long-press a photo to reorder".to_owned()
        };
    }
}

pub fn run() {
    let mut app = grid_helpers::get_default_app("Photo Grid");

    app.add_plugins(DragGridPlugin::<Entry>::default())
        .insert_resource(GridConfig {
            columns: COLUMNS,
            margins: Margins {
                top: HEADER_HEIGHT,
                ..Margins::default()
            },
            ..GridConfig::default()
        })
        .insert_resource(GridData(initial_entries()))
        .insert_resource(LockedCells::from_fn(|entry: &Entry, _| {
            matches!(entry, Entry::Add)
        }))
        .insert_resource(CellRenderer::<Entry>(Arc::new(render_photo)))
        .insert_resource(LockedCellRenderer::<Entry>(Some(Arc::new(render_add))))
        .insert_resource(EditMode::default())
        .insert_resource(NextPhotoId(INITIAL_PHOTOS))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                enter_edit_on_drag,
                handle_taps,
                commit_order,
                exit_edit_on_escape,
                update_header,
            ),
        );

    app.run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_keys_are_stable_identities() {
        assert_eq!(Entry::Add.key(), "+");
        let photo = Entry::Photo { id: 7, hue: 3 };
        assert_eq!(photo.key(), "7");
        let recolored = Entry::Photo { id: 7, hue: 5 };
        assert_eq!(photo.key(), recolored.key(), "hue does not change identity");
    }

    #[test]
    fn initial_roll_starts_with_the_add_cell() {
        let entries = initial_entries();
        assert_eq!(entries.first(), Some(&Entry::Add));
        assert_eq!(entries.len() as u32, INITIAL_PHOTOS + 1);
    }
}
