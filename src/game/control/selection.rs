use bevy::prelude::*;

use crate::game::math::ScreenRect;
use crate::game::simulation::{Presentation, Unit, UnitId, UnitRegistry};
use super::resources::*;

// ============================================================================
// Selection Set
// ============================================================================

/// Ordered set of selected units.
///
/// Membership changes keep each unit's `accepts_orders` flag in step and are
/// reported to presentation. Ids of units that died stay in the list until the
/// next [`prune`](SelectionSet::prune); every read accessor skips them.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    members: Vec<UnitId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.members.contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member ids in selection order, stale ones included.
    pub fn ids(&self) -> &[UnitId] {
        &self.members
    }

    /// Live selected units in selection order.
    pub fn iter<'a>(&'a self, registry: &'a UnitRegistry) -> impl Iterator<Item = &'a Unit> + 'a {
        self.members.iter().filter_map(move |id| registry.get(*id))
    }

    pub fn has_combat_capable(&self, registry: &UnitRegistry) -> bool {
        self.iter(registry).any(Unit::is_combat_capable)
    }

    /// Drop ids that no longer resolve. Returns how many were removed.
    pub fn prune(&mut self, registry: &UnitRegistry) -> usize {
        let before = self.members.len();
        self.members.retain(|id| registry.contains(*id));
        before - self.members.len()
    }

    /// Remove a unit without notifying anyone. Used once the unit has already left the registry.
    pub(crate) fn forget(&mut self, unit: UnitId) {
        self.members.retain(|id| *id != unit);
    }

    /// Replace the selection with `unit`. Returns false (and leaves the selection
    /// empty) when the unit is gone or not selectable.
    pub fn select_single(
        &mut self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        presentation: &mut dyn Presentation,
    ) -> bool {
        self.deselect_all(registry, presentation);
        self.insert(registry, unit, presentation)
    }

    /// Flip membership of `unit`. Returns whether it is selected afterwards.
    pub fn toggle(
        &mut self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        presentation: &mut dyn Presentation,
    ) -> bool {
        self.prune(registry);
        if self.contains(unit) {
            self.members.retain(|id| *id != unit);
            set_member_flag(registry, unit, false, presentation);
            false
        } else {
            self.insert(registry, unit, presentation)
        }
    }

    /// Add `unit` if it is not selected yet. Returns whether it was added.
    pub fn add(
        &mut self,
        registry: &mut UnitRegistry,
        unit: UnitId,
        presentation: &mut dyn Presentation,
    ) -> bool {
        self.prune(registry);
        if self.contains(unit) {
            return false;
        }
        self.insert(registry, unit, presentation)
    }

    pub fn deselect_all(&mut self, registry: &mut UnitRegistry, presentation: &mut dyn Presentation) {
        for unit in self.members.drain(..) {
            set_member_flag(registry, unit, false, presentation);
        }
    }

    fn insert(&mut self, registry: &mut UnitRegistry, unit: UnitId, presentation: &mut dyn Presentation) -> bool {
        let selectable = registry.get(unit).is_some_and(Unit::is_selectable);
        if !selectable {
            return false;
        }
        self.members.push(unit);
        set_member_flag(registry, unit, true, presentation);
        true
    }
}

/// Stale ids are skipped silently; a dead unit has nothing left to un-highlight.
fn set_member_flag(registry: &mut UnitRegistry, unit: UnitId, selected: bool, presentation: &mut dyn Presentation) {
    let Some(u) = registry.get_mut(unit) else { return };
    u.accepts_orders = selected;
    presentation.selection_changed(unit, selected);
}

// ============================================================================
// Selection Box UI
// ============================================================================

/// Setup the selection box UI element
pub fn setup_selection_box(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            border: UiRect::all(Val::Px(2.0)),
            ..default()
        },
        BorderColor::from(Color::WHITE),
        BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.1)),
        Visibility::Hidden,
        SelectionBox,
    ));
}

/// Mirror the drag rectangle onto the selection box node.
pub fn update_selection_box(
    drag_state: Res<DragState>,
    mut q_selection_box: Query<(&mut Node, &mut Visibility), With<SelectionBox>>,
) {
    let Ok((mut node, mut visibility)) = q_selection_box.single_mut() else { return };

    let (Some(start), Some(current)) = (drag_state.start, drag_state.current) else {
        *visibility = Visibility::Hidden;
        return;
    };

    let rect = ScreenRect::from_corners(start, current);
    let size = rect.size();
    node.left = Val::Px(rect.min.x);
    node.top = Val::Px(rect.min.y);
    node.width = Val::Px(size.x);
    node.height = Val::Px(size.y);
    *visibility = Visibility::Visible;
}
