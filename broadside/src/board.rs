//! Types that make up the game board.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use tracing::{debug, trace, warn};

use crate::{
    events::{reconcile_sunk, AttackOutcome, GameEvent, PlacementRecord},
    ships::{Fleet, Line, ShapeProjection, Ship, ShipId, SHIP_COUNT},
};

pub(crate) use self::grid::Grid;
pub use self::{
    cell::{Cell, CellState, CellStyle, ShotResult},
    coordinate::{
        Axis, Coordinate, Direction, UniformCoordinate, BOARD_SIZE, FULL_GRID, TOTAL_CELLS,
    },
    errors::{CannotPlaceReason, CannotShootReason, PlaceError, PopulateError, ShotError},
};

mod cell;
mod coordinate;
mod errors;
mod grid;

/// Number of random placements [`Gameboard::populate_board`] tries before giving up.
pub const POPULATE_ATTEMPTS: usize = 10_000;

/// A single player's board: the grid, the ships placed on it and every shot it took.
///
/// A match owns one board per role (the local player's board, the mirror of the
/// opponent's board, and in singleplayer the computer's hidden board). Boards are
/// [`reset`][Gameboard::reset] between rematches rather than recreated.
#[derive(Debug, Clone)]
pub struct Gameboard {
    grid: Grid,

    /// Placed ships by id. The cells refer back to these by id only.
    ships: HashMap<ShipId, Ship>,

    /// How much of the fixed fleet has been placed.
    fleet: Fleet,

    /// Default orientation for cursor-driven placement.
    axis: Axis,

    /// Placement log, in placement order.
    build_array: Vec<PlacementRecord>,

    /// Every coordinate ever attacked on this board.
    hits: HashSet<Coordinate>,

    num_sunk_ships: usize,

    /// Cursor position.
    selected: Coordinate,

    /// Cells currently carrying a transient style.
    styled: Vec<Coordinate>,
}

impl Gameboard {
    /// Construct an empty board.
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            ships: HashMap::new(),
            fleet: Fleet::default(),
            axis: Axis::default(),
            build_array: Vec::new(),
            hits: HashSet::new(),
            num_sunk_ships: 0,
            selected: Coordinate::new(0, 0),
            styled: Vec::new(),
        }
    }

    /// Get the cell at the given coordinate. Returns `None` if it is out of bounds.
    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.grid.get(coord)
    }

    /// Iterate the rows of the board, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.grid.rows()
    }

    /// Get an iterator over all ships on this board.
    pub fn ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values()
    }

    /// Get the ship with the specified ID if it exists.
    pub fn ship(&self, id: &ShipId) -> Option<&Ship> {
        self.ships.get(id)
    }

    /// The placement log, in the order ships were placed.
    pub fn placements(&self) -> &[PlacementRecord] {
        &self.build_array
    }

    /// Every coordinate attacked so far.
    pub fn hits(&self) -> &HashSet<Coordinate> {
        &self.hits
    }

    pub fn num_sunk_ships(&self) -> usize {
        self.num_sunk_ships
    }

    /// Returns true once the whole fleet has been sunk.
    pub fn all_ships_sunk(&self) -> bool {
        self.num_sunk_ships >= SHIP_COUNT
    }

    /// Whether a shot at `coord` would be accepted.
    pub fn can_attack(&self, coord: Coordinate) -> bool {
        coord.in_bounds() && !self.all_ships_sunk() && !self.hits.contains(&coord)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Flip the placement axis and drop any placement preview.
    pub fn toggle_axis(&mut self) {
        self.axis = self.axis.other();
        self.clear_styles();
    }

    /// Current cursor position.
    pub fn selected(&self) -> Coordinate {
        self.selected
    }

    /// Length of the next ship waiting to be placed, longest first. Returns 0 once the
    /// whole fleet is on the board.
    pub fn ship_length(&self) -> usize {
        self.fleet.next_length()
    }

    /// Walk the placement from `start` and stop at the first cell that is off the board
    /// or occupied. Returns the cells before that point and the violation, if any.
    fn project_placement(
        &self,
        start: Coordinate,
        axis: Axis,
        length: usize,
    ) -> (ShapeProjection, Option<CannotPlaceReason>) {
        let mut cells = Vec::with_capacity(length);
        for pos in Line::new(length).project(start, axis) {
            match pos.and_then(|coord| self.grid.get(coord)) {
                None => return (cells, Some(CannotPlaceReason::OutOfBounds)),
                Some(cell) if cell.ship_id().is_some() => {
                    return (cells, Some(CannotPlaceReason::AlreadyOccupied))
                }
                Some(cell) => cells.push(cell.coord()),
            }
        }
        (cells, None)
    }

    /// Check where a ship of `length` anchored at `coord` along `axis` would go, without
    /// placing it.
    pub fn check_placement(
        &self,
        coord: Coordinate,
        axis: Axis,
        length: usize,
    ) -> Result<ShapeProjection, PlaceError> {
        if length == 0 {
            return Err(PlaceError::new(
                CannotPlaceReason::FleetExhausted,
                coord,
                axis,
                length,
            ));
        }
        match self.project_placement(coord, axis, length) {
            (cells, None) => Ok(cells),
            (_, Some(reason)) => Err(PlaceError::new(reason, coord, axis, length)),
        }
    }

    /// Returns true if a ship of `length` fits at `coord` along `axis`: it stays on the
    /// board and overlaps no other ship.
    pub fn is_valid_placement(&self, coord: Coordinate, axis: Axis, length: usize) -> bool {
        self.check_placement(coord, axis, length).is_ok()
    }

    /// Like [`is_valid_placement`][Gameboard::is_valid_placement] along the board's
    /// current axis, but also styles the cells the ship would cover for display.
    ///
    /// Marking stops at the first cell that is off the board or occupied, the same place
    /// the check stops. Every marked cell gets the same style: [`CellStyle::Valid`] if
    /// the whole ship fits, [`CellStyle::Invalid`] otherwise.
    pub fn preview_placement(&mut self, coord: Coordinate, length: usize) -> bool {
        self.clear_styles();
        let (cells, violation) = self.project_placement(coord, self.axis, length);
        let valid = length > 0 && violation.is_none();
        let style = if valid {
            CellStyle::Valid
        } else {
            CellStyle::Invalid
        };
        for coord in cells {
            self.grid[coord].set_style(style);
            self.styled.push(coord);
        }
        valid
    }

    /// Remove every transient style from the board.
    pub fn clear_styles(&mut self) {
        for coord in self.styled.drain(..) {
            self.grid[coord].set_style(CellStyle::None);
        }
    }

    /// Move the cursor to `coord` and style the cell by whether it may still be
    /// attacked. Out of bounds coordinates are ignored.
    pub fn select(&mut self, coord: Coordinate) {
        let state = match self.grid.get(coord) {
            Some(cell) => cell.state(),
            None => return,
        };
        self.clear_styles();
        self.selected = coord;
        let style = match state {
            CellState::Empty | CellState::Ship => CellStyle::SelectedValid,
            CellState::ShotMiss => CellStyle::SelectedInvalidMiss,
            CellState::ShipHit | CellState::ShipSunk => CellStyle::SelectedInvalidShip,
        };
        self.grid[coord].set_style(style);
        self.styled.push(coord);
    }

    /// Move the cursor one cell, staying on the board.
    pub fn move_cursor(&mut self, dir: Direction) {
        self.select(self.selected.clamped_offset(dir));
    }

    /// Place the next ship of the fleet at the cursor along the current axis.
    pub fn place_ship(&mut self) -> Result<ShipId, PlaceError> {
        let length = self.ship_length();
        self.place_ship_at(self.selected, self.axis, length, None)
    }

    /// Place a ship of `length` anchored at `coord` along `axis`. A fresh id is
    /// generated unless one is supplied, as it is when replaying a placement log.
    ///
    /// On failure the board is left untouched.
    pub fn place_ship_at(
        &mut self,
        coord: Coordinate,
        axis: Axis,
        length: usize,
        id: Option<ShipId>,
    ) -> Result<ShipId, PlaceError> {
        if !self.fleet.has_slot(length) {
            return Err(PlaceError::new(
                CannotPlaceReason::FleetExhausted,
                coord,
                axis,
                length,
            ));
        }
        if let Some(ref id) = id {
            if self.ships.contains_key(id) {
                return Err(PlaceError::new(
                    CannotPlaceReason::AlreadyPlaced,
                    coord,
                    axis,
                    length,
                ));
            }
        }
        let cells = self.check_placement(coord, axis, length)?;
        let id = id.unwrap_or_else(|| ShipId::generate(&mut rand::thread_rng()));

        let mut ship = Ship::new(id.clone(), length);
        // Already ensured that every position is valid and not occupied.
        for coord in cells {
            self.grid[coord].add_ship(id.clone());
            ship.add_cell(coord);
        }
        self.ships.insert(id.clone(), ship);
        self.build_array.push(PlacementRecord {
            coordinates: coord,
            axis,
            ship_length: length,
            ship_id: id.clone(),
        });
        self.fleet.record(length);
        self.clear_styles();
        debug!(ship = %id, ?coord, ?axis, length, "placed ship");
        Ok(id)
    }

    /// Reset the board and place the whole fleet at random.
    ///
    /// Gives up with a [`PopulateError`] after [`POPULATE_ATTEMPTS`] random draws.
    pub fn populate_board<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), PopulateError> {
        self.reset();
        for attempt in 0..POPULATE_ATTEMPTS {
            let length = self.ship_length();
            if length == 0 {
                debug!(attempts = attempt, "populated board");
                return Ok(());
            }
            let axis: Axis = rng.gen();
            let start = rng.sample(&*FULL_GRID);
            if self.is_valid_placement(start, axis, length) {
                let id = ShipId::generate(rng);
                if let Err(err) = self.place_ship_at(start, axis, length, Some(id)) {
                    trace!(%err, "random placement rejected");
                }
            }
        }
        if self.ship_length() == 0 {
            Ok(())
        } else {
            warn!(placed = self.fleet.placed(), "gave up populating board");
            Err(PopulateError::new(POPULATE_ATTEMPTS))
        }
    }

    /// Fire a shot at this board, returning the outcome or the reason the shot was
    /// refused. A refused shot leaves the board unchanged.
    pub fn receive_attack(&mut self, coord: Coordinate) -> Result<AttackOutcome, ShotError> {
        if self.all_ships_sunk() {
            return Err(ShotError::new(CannotShootReason::AlreadyDefeated, coord));
        }
        let hit_ship = match self.grid.get_mut(coord) {
            None => return Err(ShotError::new(CannotShootReason::OutOfBounds, coord)),
            Some(cell) if cell.attacked() || self.hits.contains(&coord) => {
                return Err(ShotError::new(CannotShootReason::AlreadyShot, coord))
            }
            Some(cell) => cell.receive_attack().cloned(),
        };
        self.hits.insert(coord);

        let result = match hit_ship {
            None => ShotResult::ShotMiss,
            Some(ref id) => match self.ships.get_mut(id) {
                Some(ship) => ship.damage(&mut self.grid),
                None => ShotResult::ShipHit,
            },
        };
        if result == ShotResult::ShipSunk {
            self.num_sunk_ships += 1;
        }
        let outcome = AttackOutcome {
            result,
            all_ships_sunk: result == ShotResult::ShipSunk && self.all_ships_sunk(),
            ship_id: hit_ship,
        };
        debug!(?coord, ?result, sunk = self.num_sunk_ships, "received attack");
        Ok(outcome)
    }

    /// Rebuild a board from its stored placement log and the attacks made against it.
    ///
    /// Placements are only replayed into an empty board, so calling this again with a
    /// longer event list just applies the new attacks. If any placement fails, the board
    /// is reset so a corrected log can be replayed.
    pub fn build_player_board(
        &mut self,
        events: &[GameEvent],
        placements: &[PlacementRecord],
    ) -> Result<(), PlaceError> {
        if self.build_array.is_empty() {
            for record in placements {
                if let Err(err) = self.place_ship_at(
                    record.coordinates,
                    record.axis,
                    record.ship_length,
                    Some(record.ship_id.clone()),
                ) {
                    warn!(%err, "placement log does not replay");
                    self.reset();
                    return Err(err);
                }
            }
        }
        for event in events {
            match self.receive_attack(event.coordinates) {
                Ok(outcome) if outcome.result != event.result => warn!(
                    coord = ?event.coordinates,
                    logged = ?event.result,
                    replayed = ?outcome.result,
                    "replayed attack disagrees with the log"
                ),
                Ok(_) => {}
                Err(err) => trace!(%err, "skipping replayed attack"),
            }
        }
        Ok(())
    }

    /// Rebuild the mirror of an opponent's board from the attacks made against it.
    ///
    /// The real ship layout is unknown, so cells take whatever the events reported.
    /// Afterwards every hit on a ship that the log later reports sunk is marked sunk.
    pub fn build_enemy_board(&mut self, events: &[GameEvent]) {
        for event in events {
            let coord = event.coordinates;
            if !coord.in_bounds() || !self.hits.insert(coord) {
                continue;
            }
            if event.result == ShotResult::ShipSunk {
                self.num_sunk_ships += 1;
            }
            self.grid[coord].observe(event.result.into(), event.ship_id.clone());
        }
        for event in reconcile_sunk(events) {
            if event.result == ShotResult::ShipSunk {
                if let Some(cell) = self.grid.get_mut(event.coordinates) {
                    cell.set_state(CellState::ShipSunk);
                }
            }
        }
    }

    /// Clear the board for a new round: empty grid, no ships, no shots, cursor and axis
    /// back to their defaults.
    pub fn reset(&mut self) {
        self.grid = Grid::new();
        self.ships.clear();
        self.fleet.reset();
        self.build_array.clear();
        self.hits.clear();
        self.num_sunk_ships = 0;
        self.selected = Coordinate::new(0, 0);
        self.axis = Axis::default();
        self.styled.clear();
    }
}

impl Default for Gameboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::ships::FLEET_CELLS;

    fn coord(x: usize, y: usize) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn count_state(board: &Gameboard, state: CellState) -> usize {
        board.grid.iter().filter(|cell| cell.state() == state).count()
    }

    /// Lay the whole fleet out on rows 0 through 6, each ship starting at x = 0.
    fn place_fleet_in_rows(board: &mut Gameboard) {
        let mut y = 0;
        loop {
            let length = board.ship_length();
            if length == 0 {
                break;
            }
            board
                .place_ship_at(coord(0, y), Axis::X, length, Some(ShipId::from(format!("row{}", y))))
                .unwrap();
            y += 1;
        }
    }

    #[test]
    fn overlapping_placement_is_rejected() {
        let mut board = Gameboard::new();
        board.place_ship_at(coord(2, 2), Axis::X, 5, None).unwrap();
        let err = board
            .place_ship_at(coord(4, 0), Axis::Y, 4, None)
            .unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::AlreadyOccupied);
        assert_eq!(board.ship_length(), 4);
        assert_eq!(board.placements().len(), 1);
        assert_eq!(count_state(&board, CellState::Ship), 5);
    }

    #[test]
    fn populate_places_the_whole_fleet() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut board = Gameboard::new();
        board.populate_board(&mut rng).unwrap();
        assert_eq!(board.ship_length(), 0);
        assert_eq!(count_state(&board, CellState::Ship), FLEET_CELLS);
        let ids: HashSet<_> = board.grid.iter().filter_map(|cell| cell.ship_id()).collect();
        assert_eq!(ids.len(), SHIP_COUNT);
        assert_eq!(board.placements().len(), SHIP_COUNT);
    }

    #[test]
    fn populate_is_deterministic_for_a_seed() {
        let mut a = Gameboard::new();
        let mut b = Gameboard::new();
        a.populate_board(&mut StdRng::seed_from_u64(3)).unwrap();
        b.populate_board(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.placements(), b.placements());
    }

    #[test]
    fn cells_can_only_be_attacked_once() {
        let mut board = Gameboard::new();
        board.place_ship_at(coord(0, 0), Axis::X, 2, None).unwrap();
        for target in [coord(0, 0), coord(5, 5)].iter() {
            assert!(board.receive_attack(*target).is_ok());
            let err = board.receive_attack(*target).unwrap_err();
            assert_eq!(err.reason(), CannotShootReason::AlreadyShot);
        }
    }

    #[test]
    fn last_hit_sinks_the_whole_ship() {
        let mut board = Gameboard::new();
        let id = board.place_ship_at(coord(0, 0), Axis::X, 3, None).unwrap();
        let results: Vec<_> = (0..3)
            .map(|x| board.receive_attack(coord(x, 0)).unwrap())
            .collect();
        assert_eq!(
            results.iter().map(|o| o.result).collect::<Vec<_>>(),
            vec![ShotResult::ShipHit, ShotResult::ShipHit, ShotResult::ShipSunk]
        );
        assert!(results.iter().all(|o| o.ship_id.as_ref() == Some(&id)));
        assert!(!results[2].all_ships_sunk);
        for x in 0..3 {
            assert_eq!(board.cell(coord(x, 0)).unwrap().state(), CellState::ShipSunk);
        }
        assert_eq!(board.num_sunk_ships(), 1);
    }

    #[test]
    fn miss_has_no_ship() {
        let mut board = Gameboard::new();
        let outcome = board.receive_attack(coord(9, 9)).unwrap();
        assert_eq!(outcome.result, ShotResult::ShotMiss);
        assert_eq!(outcome.ship_id, None);
    }

    #[test]
    fn seventh_sink_ends_the_board() {
        let mut board = Gameboard::new();
        place_fleet_in_rows(&mut board);
        let mut last = None;
        for record in board.placements().to_vec() {
            for x in 0..record.ship_length {
                last = Some(board.receive_attack(coord(x, record.coordinates.y)).unwrap());
            }
        }
        assert!(last.unwrap().all_ships_sunk);
        assert!(board.all_ships_sunk());
        let err = board.receive_attack(coord(9, 9)).unwrap_err();
        assert_eq!(err.reason(), CannotShootReason::AlreadyDefeated);
    }

    #[test]
    fn reset_empties_the_board() {
        let mut board = Gameboard::new();
        board.populate_board(&mut StdRng::seed_from_u64(9)).unwrap();
        board.receive_attack(coord(4, 4)).unwrap();
        board.toggle_axis();
        board.select(coord(3, 3));
        board.reset();
        assert_eq!(count_state(&board, CellState::Empty), TOTAL_CELLS);
        assert!(board.placements().is_empty());
        assert!(board.hits().is_empty());
        assert_eq!(board.ship_length(), 5);
        assert_eq!(board.axis(), Axis::X);
        assert_eq!(board.selected(), coord(0, 0));
        assert_eq!(board.num_sunk_ships(), 0);
    }

    #[test]
    fn enemy_board_marks_earlier_hits_sunk() {
        let events = vec![
            GameEvent {
                coordinates: coord(3, 3),
                player_id: "p1".into(),
                result: ShotResult::ShipHit,
                ship_id: Some("s1".into()),
            },
            GameEvent {
                coordinates: coord(3, 4),
                player_id: "p1".into(),
                result: ShotResult::ShipSunk,
                ship_id: Some("s1".into()),
            },
        ];
        let mut mirror = Gameboard::new();
        mirror.build_enemy_board(&events);
        assert_eq!(mirror.cell(coord(3, 3)).unwrap().state(), CellState::ShipSunk);
        assert_eq!(mirror.cell(coord(3, 4)).unwrap().state(), CellState::ShipSunk);
        assert_eq!(mirror.num_sunk_ships(), 1);

        // Replaying the same log again changes nothing.
        mirror.build_enemy_board(&events);
        assert_eq!(mirror.num_sunk_ships(), 1);
        assert_eq!(mirror.hits().len(), 2);
    }

    #[test]
    fn later_sink_upgrades_earlier_mirror_hits() {
        let hit = GameEvent {
            coordinates: coord(0, 0),
            player_id: "p1".into(),
            result: ShotResult::ShipHit,
            ship_id: Some("s1".into()),
        };
        let sink = GameEvent {
            coordinates: coord(1, 0),
            player_id: "p1".into(),
            result: ShotResult::ShipSunk,
            ship_id: Some("s1".into()),
        };
        let mut mirror = Gameboard::new();
        mirror.build_enemy_board(&[hit.clone()]);
        assert_eq!(mirror.cell(coord(0, 0)).unwrap().state(), CellState::ShipHit);
        assert_eq!(mirror.num_sunk_ships(), 0);

        mirror.build_enemy_board(&[hit, sink]);
        assert_eq!(mirror.cell(coord(0, 0)).unwrap().state(), CellState::ShipSunk);
        assert_eq!(mirror.cell(coord(1, 0)).unwrap().state(), CellState::ShipSunk);
        assert_eq!(mirror.num_sunk_ships(), 1);
    }

    #[test]
    fn failed_placement_log_leaves_board_rebuildable() {
        let record = |x: usize, axis: Axis, len: usize, id: &str| PlacementRecord {
            coordinates: coord(x, 0),
            axis,
            ship_length: len,
            ship_id: id.into(),
        };
        let mut board = Gameboard::new();
        let err = board
            .build_player_board(&[], &[record(0, Axis::X, 5, "a"), record(2, Axis::Y, 4, "b")])
            .unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::AlreadyOccupied);
        assert!(board.placements().is_empty());
        assert_eq!(count_state(&board, CellState::Ship), 0);

        let fixed = [record(0, Axis::X, 5, "a"), record(5, Axis::Y, 4, "b")];
        board.build_player_board(&[], &fixed).unwrap();
        assert_eq!(board.placements(), &fixed[..]);
        assert_eq!(board.ship_length(), 3);
    }

    #[test]
    fn placement_must_stay_on_the_board() {
        let board = Gameboard::new();
        assert!(!board.is_valid_placement(coord(6, 0), Axis::X, 5));
        assert!(board.is_valid_placement(coord(5, 0), Axis::X, 5));
        assert!(!board.is_valid_placement(coord(0, 6), Axis::Y, 5));
        assert!(!board.is_valid_placement(coord(0, 0), Axis::X, 0));
    }

    #[test]
    fn preview_stops_at_the_first_violation() {
        let mut board = Gameboard::new();
        board.place_ship_at(coord(3, 0), Axis::Y, 2, None).unwrap();

        assert!(!board.preview_placement(coord(0, 0), 5));
        let styles: Vec<_> = (0..6)
            .map(|x| board.cell(coord(x, 0)).unwrap().style())
            .collect();
        assert_eq!(
            styles,
            vec![
                CellStyle::Invalid,
                CellStyle::Invalid,
                CellStyle::Invalid,
                CellStyle::None,
                CellStyle::None,
                CellStyle::None,
            ]
        );

        assert!(!board.preview_placement(coord(7, 5), 4));
        assert_eq!(board.cell(coord(0, 0)).unwrap().style(), CellStyle::None);
        for x in 7..10 {
            assert_eq!(board.cell(coord(x, 5)).unwrap().style(), CellStyle::Invalid);
        }

        board.toggle_axis();
        assert!(board.preview_placement(coord(0, 5), 5));
        for y in 5..10 {
            assert_eq!(board.cell(coord(0, y)).unwrap().style(), CellStyle::Valid);
        }
        board.toggle_axis();
        assert_eq!(board.cell(coord(0, 5)).unwrap().style(), CellStyle::None);
    }

    #[test]
    fn cursor_placement_uses_axis_and_fleet_order() {
        let mut board = Gameboard::new();
        board.toggle_axis();
        board.select(coord(9, 0));
        let id = board.place_ship().unwrap();
        assert_eq!(board.ship(&id).unwrap().cells().len(), 5);
        assert_eq!(board.cell(coord(9, 4)).unwrap().ship_id(), Some(&id));
        assert_eq!(board.ship_length(), 4);

        board.move_cursor(Direction::Right);
        assert_eq!(board.selected(), coord(9, 0));
        board.move_cursor(Direction::Left);
        assert_eq!(board.selected(), coord(8, 0));
    }

    #[test]
    fn fleet_cannot_be_overfilled() {
        let mut board = Gameboard::new();
        place_fleet_in_rows(&mut board);
        assert_eq!(board.ship_length(), 0);
        let err = board.place_ship().unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::FleetExhausted);
        let err = board
            .place_ship_at(coord(0, 9), Axis::X, 2, None)
            .unwrap_err();
        assert_eq!(err.reason(), CannotPlaceReason::FleetExhausted);
    }

    #[test]
    fn selection_reflects_attack_state() {
        let mut board = Gameboard::new();
        board.place_ship_at(coord(0, 0), Axis::X, 2, None).unwrap();
        board.receive_attack(coord(0, 0)).unwrap();
        board.receive_attack(coord(5, 5)).unwrap();

        board.select(coord(0, 0));
        assert_eq!(board.cell(coord(0, 0)).unwrap().style(), CellStyle::SelectedInvalidShip);
        board.select(coord(5, 5));
        assert_eq!(board.cell(coord(0, 0)).unwrap().style(), CellStyle::None);
        assert_eq!(board.cell(coord(5, 5)).unwrap().style(), CellStyle::SelectedInvalidMiss);
        board.select(coord(1, 0));
        assert_eq!(board.cell(coord(1, 0)).unwrap().style(), CellStyle::SelectedValid);
    }

    #[test]
    fn player_board_replays_placements_and_attacks() {
        let mut original = Gameboard::new();
        original.populate_board(&mut StdRng::seed_from_u64(11)).unwrap();
        let mut events = Vec::new();
        for target in [coord(0, 0), coord(4, 7), coord(9, 2)].iter() {
            let outcome = original.receive_attack(*target).unwrap();
            events.push(GameEvent::new(*target, "p2", &outcome));
        }

        let mut rebuilt = Gameboard::new();
        rebuilt
            .build_player_board(&events[..2], original.placements())
            .unwrap();
        // A second call only applies the new event.
        rebuilt
            .build_player_board(&events, original.placements())
            .unwrap();
        assert_eq!(rebuilt.placements(), original.placements());
        assert_eq!(rebuilt.hits(), original.hits());
        for (a, b) in rebuilt.grid.iter().zip(original.grid.iter()) {
            assert_eq!(a.state(), b.state());
            assert_eq!(a.ship_id(), b.ship_id());
        }
    }
}
