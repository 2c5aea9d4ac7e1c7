use std::collections::BTreeMap;

use glam::Mat4;

use crate::{
    UndoError,
    anim::{Animation, CaptureAnimation, InvalidPickAnimation, Playback},
    core::{CellId, GamePiece, Move, PieceMoves, Side, Timestamp, ValidMove, ValidMoveSet},
    engine::{
        BoardCell, CaptureLink, CellSets, GameState, KingRule, Layout, LinkState, PickResult,
        PieceSupport, Settings, TimerSnapshot, Travel, TravelStage, Undo, rules,
    },
};

const HIGHLIGHT_PERIOD_MS: f32 = 250.0;
const HIGHLIGHT_WRAP: f32 = 6.28;

/// Aggregate animation status reported by [`Board::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BoardStatus {
    /// Nothing structural is animating.
    Idle,
    /// A move or an undo is still animating.
    Animating,
    /// A move finished on this update.
    MoveFinished { result: PickResult, promoted: bool },
    /// An undo finished on this update; `turn` is the side that had played the move.
    UndoFinished { turn: Side },
}

/// Outcome of a pick routed to the board.
#[derive(Debug, Clone, PartialEq)]
pub enum PickResponse {
    Resolved(PickResult),
    /// The pick completed a legal move, which is now animating.
    MoveAccepted(Undo),
}

/// How a destination cell is highlighted while a piece is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Highlight {
    None,
    Move,
    Capture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InFlight {
    Play { to: CellId, turn: Side, captured: bool },
    Replay,
    Undo { mv: Move, turn: Side },
}

/// The 8×8 board: cells, ownership sets, legal moves and the move in flight.
///
/// Ownership sets change as soon as a move is accepted; cells only catch up when
/// the move animation has finished. At most one move (or undo) is in flight.
#[derive(Debug, Clone)]
pub struct Board {
    settings: Settings,
    king_rule: KingRule,
    initial: Layout,
    cells: Vec<BoardCell>,
    sets: CellSets,
    valid_moves: ValidMoveSet,
    selected: Option<CellId>,
    moving: Option<CellId>,
    in_flight: Option<InFlight>,
    invalid_picks: BTreeMap<CellId, InvalidPickAnimation>,
    supports: [PieceSupport; 2],
    created: bool,
    highlight_phase: f32,
}

impl Board {
    #[must_use]
    pub fn new(settings: Settings, layout: Layout, king_rule: KingRule, turn: Side) -> Self {
        let supports = Side::ALL.map(|side| PieceSupport::new(side, &settings));
        let mut board = Self {
            settings,
            king_rule,
            initial: layout.clone(),
            cells: Vec::new(),
            sets: CellSets::from_layout(&layout),
            valid_moves: ValidMoveSet::new(),
            selected: None,
            moving: None,
            in_flight: None,
            invalid_picks: BTreeMap::new(),
            supports,
            created: false,
            highlight_phase: 0.0,
        };
        board.init_cells(&layout);
        board.set_valid_moves(turn);
        board
    }

    #[must_use]
    pub fn standard(settings: Settings, king_rule: KingRule, turn: Side) -> Self {
        Self::new(settings, Layout::standard(), king_rule, turn)
    }

    fn init_cells(&mut self, layout: &Layout) {
        let size = self.settings.cell_size();
        self.cells = CellId::all()
            .map(|id| BoardCell::new(id.position(), size, layout.piece_at(id.position())))
            .collect();
    }

    /// Puts every piece back where the game started and replays the fall-in.
    pub fn reset(&mut self) {
        let layout = self.initial.clone();
        self.init_cells(&layout);
        self.sets = CellSets::from_layout(&layout);
        self.valid_moves.clear();
        self.selected = None;
        self.moving = None;
        self.in_flight = None;
        self.invalid_picks.clear();
        for support in &mut self.supports {
            support.clear();
        }
        self.created = false;
        self.highlight_phase = 0.0;
    }

    /// Marks the board as created without playing the fall-in.
    pub fn skip_creation(&mut self) {
        for cell in &mut self.cells {
            cell.skip_fall_in();
        }
        self.created = true;
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn king_rule(&self) -> KingRule {
        self.king_rule
    }

    #[must_use]
    pub fn cell(&self, id: CellId) -> &BoardCell {
        &self.cells[id.index()]
    }

    fn cell_mut(&mut self, id: CellId) -> &mut BoardCell {
        &mut self.cells[id.index()]
    }

    pub fn cells(&self) -> impl Iterator<Item = &BoardCell> {
        self.cells.iter()
    }

    #[must_use]
    pub fn sets(&self) -> &CellSets {
        &self.sets
    }

    #[must_use]
    pub fn valid_moves(&self) -> &ValidMoveSet {
        &self.valid_moves
    }

    #[must_use]
    pub fn selected(&self) -> Option<CellId> {
        self.selected
    }

    /// Cell whose piece is travelling, if a move or undo is in flight.
    #[must_use]
    pub fn moving(&self) -> Option<CellId> {
        self.moving
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.moving.is_some()
    }

    #[must_use]
    pub fn is_created(&self) -> bool {
        self.created
    }

    #[must_use]
    pub fn support(&self, side: Side) -> &PieceSupport {
        &self.supports[side.index()]
    }

    /// Pulse phase of the highlighted destinations, in radians.
    #[must_use]
    pub fn highlight_phase(&self) -> f32 {
        self.highlight_phase
    }

    /// Snapshot of the logical position.
    #[must_use]
    pub fn layout(&self) -> Layout {
        let mut layout = Layout::empty();
        for side in Side::ALL {
            for &id in self.sets.side(side) {
                // The sets already hold the destination of a piece in flight,
                // so its rank comes from the travelling cell, not from `id`.
                let rank = self
                    .cells
                    .iter()
                    .find_map(|cell| {
                        let travel = cell.travel()?;
                        (travel.destination() == id).then_some(cell.piece())?
                    })
                    .or_else(|| self.cell(id).piece())
                    .map(GamePiece::rank)
                    .unwrap_or_default();
                layout.set(id.position(), Some((side, rank)));
            }
        }
        layout
    }

    /// Moves of `turn`'s piece on `id` under the one-step rule.
    #[must_use]
    pub fn get_moves(&self, turn: Side, id: CellId) -> PieceMoves {
        let layout = self.layout();
        match layout.get(id.position()) {
            Some((side, rank)) if side == turn => {
                rules::step_moves(&layout, id.position(), side, rank)
            }
            _ => PieceMoves::new(),
        }
    }

    /// Moves of `turn`'s king on `id` under the flying rule.
    #[must_use]
    pub fn get_king_valid_moves(&self, turn: Side, id: CellId) -> PieceMoves {
        let layout = self.layout();
        match layout.get(id.position()) {
            Some((side, rank)) if side == turn && rank.is_king() => {
                rules::flying_king_moves(&layout, id.position(), side)
            }
            _ => PieceMoves::new(),
        }
    }

    /// Moves of `turn`'s piece on `id` under the board's king rule.
    #[must_use]
    pub fn get_valid_moves(&self, turn: Side, id: CellId) -> PieceMoves {
        let layout = self.layout();
        if layout.side_at(id.position()) != Some(turn) {
            return PieceMoves::new();
        }
        rules::piece_moves(&layout, id.position(), self.king_rule)
    }

    /// Recomputes the legal moves of `turn`, applying the forced-capture rule.
    pub fn set_valid_moves(&mut self, turn: Side) {
        self.valid_moves = rules::side_moves(&self.layout(), turn, self.king_rule);
        tracing::debug!(
            %turn,
            pieces = self.valid_moves.len(),
            capture = self.valid_moves.has_capture(),
            "valid moves computed"
        );
    }

    pub(crate) fn restore_valid_moves(&mut self, valid_moves: ValidMoveSet) {
        self.valid_moves = valid_moves;
    }

    /// Whether `id` holds a piece that can move now; starts the bounce if not.
    pub fn check_valid(&mut self, id: CellId) -> bool {
        if self.valid_moves.contains_origin(id) {
            return true;
        }
        if !self.cell(id).is_empty() {
            self.invalid_picks
                .insert(id, InvalidPickAnimation::new(self.settings.cell_size()));
        }
        false
    }

    fn select(&mut self, id: CellId) {
        self.clear_selection();
        self.selected = Some(id);
        self.cell_mut(id).turn_on_tracking_light();
    }

    pub fn clear_selection(&mut self) {
        if let Some(prev) = self.selected.take() {
            self.cell_mut(prev).turn_off_tracking_light();
        }
    }

    /// Handles a pick of cell `id` while the game is in `state`.
    pub fn pick_handler(
        &mut self,
        id: CellId,
        state: GameState,
        turn: Side,
        timer: TimerSnapshot,
    ) -> PickResponse {
        if !self.created || self.is_busy() {
            return PickResponse::Resolved(PickResult::Failure);
        }
        match state {
            GameState::PickPiece => PickResponse::Resolved(self.pick_piece(id, turn)),
            GameState::PickedPiece => {
                if let Some(origin) = self.selected
                    && let Some(valid) = self.valid_moves.find(origin, id)
                {
                    return PickResponse::MoveAccepted(self.accept_move(origin, valid, turn, timer));
                }
                PickResponse::Resolved(self.pick_piece(id, turn))
            }
            _ => PickResponse::Resolved(PickResult::Failure),
        }
    }

    fn pick_piece(&mut self, id: CellId, turn: Side) -> PickResult {
        if self.sets.owner(id) != Some(turn) {
            return PickResult::Failure;
        }
        if !self.check_valid(id) {
            tracing::debug!(cell = %id, "piece cannot move");
            return PickResult::InvalidPiece;
        }
        self.select(id);
        tracing::debug!(cell = %id, "piece selected");
        PickResult::Success
    }

    fn accept_move(
        &mut self,
        origin: CellId,
        valid: ValidMove,
        turn: Side,
        timer: TimerSnapshot,
    ) -> Undo {
        let mv = Move::new(origin, valid);
        let captured_was_king = mv
            .captured
            .and_then(|id| self.cell(id).piece())
            .is_some_and(GamePiece::is_king);
        let undo = Undo::new(mv, turn, self.valid_moves.clone(), timer, captured_was_king);

        self.make_move(&mv, turn);
        self.start_travel(&mv, Playback::Forward, false);
        self.in_flight = Some(InFlight::Play {
            to: mv.to,
            turn,
            captured: mv.captured.is_some(),
        });
        tracing::debug!(from = %mv.from, to = %mv.to, captured = ?mv.captured, "move accepted");
        undo
    }

    /// Applies `mv` to the ownership sets.
    pub fn make_move(&mut self, mv: &Move, turn: Side) {
        self.sets.apply(mv, turn);
    }

    /// Replays a recorded move, as the game film does.
    pub fn execute_move(&mut self, undo: &Undo) {
        let mv = *undo.mv();
        self.make_move(&mv, undo.turn());
        self.start_travel(&mv, Playback::Forward, false);
        self.in_flight = Some(InFlight::Replay);
    }

    /// Starts playing `undo` backwards.
    pub fn undo(&mut self, undo: &Undo) -> Result<(), UndoError> {
        if self.is_busy() {
            return Err(UndoError::AnimationInFlight);
        }
        self.clear_selection();

        let mv = *undo.mv();
        if undo.promoted()
            && let Some(piece) = self.cell_mut(mv.to).piece_mut()
        {
            piece.uncrown();
        }
        if let Some(captured) = mv.captured {
            let owner = undo.turn().opponent();
            let size = self.settings.cell_size();
            let support = &mut self.supports[owner.index()];
            let piece = support.pop();
            let target = support.capture_target(captured.position(), size);
            let cell = self.cell_mut(captured);
            cell.set_piece(piece);
            cell.capture = Some(CaptureAnimation::new(size, target, Playback::Reverse));
        }

        self.start_travel(
            &Move {
                from: mv.to,
                to: mv.from,
                captured: mv.captured,
            },
            Playback::Reverse,
            undo.captured_was_king(),
        );
        self.in_flight = Some(InFlight::Undo {
            mv,
            turn: undo.turn(),
        });
        tracing::debug!(from = %mv.to, to = %mv.from, "undo started");
        Ok(())
    }

    fn start_travel(&mut self, mv: &Move, playback: Playback, restore_king: bool) {
        let from = mv.from.position();
        let to = mv.to.position();
        let size = self.settings.cell_size();
        let Some(piece) = self.cell(mv.from).piece() else {
            tracing::warn!(cell = %mv.from, "no piece to move");
            return;
        };
        let side = piece.side();
        let promote =
            playback.is_forward() && !piece.is_king() && to.col() == side.crowning_col();
        let duration = self
            .cell(mv.from)
            .anim_duration(to, self.settings.move_time_unit)
            .unwrap_or_default();

        let capture = mv.captured.map(|captured| {
            // captured pieces are stacked on their owner's support
            let support = side.opponent();
            let row_gap = from.row().abs_diff(captured.position().row());
            CaptureLink {
                cell: captured,
                support,
                threshold: self.supports[support.index()].collision_distance(size, row_gap),
                restore_king,
                state: match playback {
                    Playback::Forward => LinkState::Waiting,
                    Playback::Reverse => LinkState::Running,
                },
            }
        });

        self.cell_mut(mv.from).travel =
            Some(Travel::new(from, to, duration, promote, playback, capture));
        self.cell_mut(mv.from).turn_on_tracking_light();
        self.selected = None;
        self.moving = Some(mv.from);
    }

    /// Advances every animation to `now`.
    pub fn update(&mut self, now: Timestamp) -> BoardStatus {
        if !self.created {
            for cell in &mut self.cells {
                cell.update_fall_in(now);
            }
            self.created = self.cells.iter().all(BoardCell::creation_anim_is_over);
            if self.created {
                tracing::debug!("board created");
            }
        }

        if self.selected.is_some() {
            self.highlight_phase = highlight_phase(now);
        }

        for anim in self.invalid_picks.values_mut() {
            anim.update(now);
        }
        self.invalid_picks.retain(|_, anim| anim.is_active());

        let Some(mover) = self.moving else {
            return BoardStatus::Idle;
        };
        match self.advance_travel(mover, now) {
            Some(promoted) => self.finish(promoted),
            None => BoardStatus::Animating,
        }
    }

    /// Returns `Some(promoted)` once every animation of the move has finished.
    fn advance_travel(&mut self, mover: CellId, now: Timestamp) -> Option<bool> {
        let mut travel = self.cell_mut(mover).travel.take()?;

        if let Some(link) = &mut travel.capture
            && link.state.is_running()
            && self.advance_capture(link, now)
        {
            link.state = LinkState::Done;
        }

        let arrived = travel.advance(now);
        if travel.playback.is_forward()
            && travel.reached_capture()
            && let Some(link) = &mut travel.capture
        {
            self.start_capture(link, now);
            if self.advance_capture(link, now) {
                link.state = LinkState::Done;
            }
        }

        let cell = self.cell_mut(mover);
        cell.follow_with_light(travel.offset());
        if arrived {
            travel.stage = TravelStage::Arrived;
            if travel.promote
                && let Some(piece) = cell.piece_mut()
            {
                piece.crown();
                travel.stage = TravelStage::Crowning;
            }
        }
        if let Some(piece) = cell.piece_mut() {
            piece.update(now);
        }
        let transforming = cell.piece().is_some_and(GamePiece::is_transforming);
        if travel.stage.is_crowning() && !transforming {
            travel.stage = TravelStage::Arrived;
        }

        if travel.stage.is_arrived() && travel.capture_done() && !transforming {
            let piece = cell.take_piece();
            cell.turn_off_tracking_light();
            self.cell_mut(travel.to).set_piece(piece);
            tracing::debug!(from = %mover, to = %travel.to, "piece settled");
            return Some(travel.promote);
        }

        self.cell_mut(mover).travel = Some(travel);
        None
    }

    fn start_capture(&mut self, link: &mut CaptureLink, now: Timestamp) {
        let size = self.settings.cell_size();
        let target =
            self.supports[link.support.index()].capture_target(link.cell.position(), size);
        let cell = self.cell_mut(link.cell);
        cell.capture = Some(CaptureAnimation::new(size, target, Playback::Forward));
        if let Some(piece) = cell.piece_mut()
            && piece.is_king()
        {
            piece.uncrown();
            piece.update(now);
        }
        link.state = LinkState::Running;
        tracing::debug!(cell = %link.cell, "capture started");
    }

    /// Advances the hop of a captured piece. Returns `true` once it is over.
    fn advance_capture(&mut self, link: &CaptureLink, now: Timestamp) -> bool {
        let cell = &mut self.cells[link.cell.index()];
        if let Some(anim) = &mut cell.capture {
            anim.update(now);
            if !anim.is_active() {
                let playback = anim.playback();
                cell.capture = None;
                match playback {
                    Playback::Forward => {
                        if let Some(mut piece) = cell.take_piece() {
                            piece.settle();
                            self.supports[link.support.index()].push(piece);
                        }
                    }
                    Playback::Reverse => {
                        if link.restore_king
                            && let Some(piece) = cell.piece_mut()
                        {
                            piece.crown();
                        }
                    }
                }
            }
        }

        let cell = &mut self.cells[link.cell.index()];
        if let Some(piece) = cell.piece_mut() {
            piece.update(now);
        }
        cell.capture.is_none() && !cell.piece().is_some_and(GamePiece::is_transforming)
    }

    fn finish(&mut self, promoted: bool) -> BoardStatus {
        self.moving = None;
        match self.in_flight.take() {
            Some(InFlight::Play { to, turn, captured }) => {
                if captured {
                    let moves = self.get_valid_moves(turn, to);
                    if moves.first().is_some_and(ValidMove::is_capture) {
                        self.valid_moves = ValidMoveSet::single(to, moves);
                        self.select(to);
                        return BoardStatus::MoveFinished {
                            result: PickResult::PlayAgain,
                            promoted,
                        };
                    }
                }
                self.set_valid_moves(turn.opponent());
                let result = if self.valid_moves.is_empty() {
                    PickResult::Won(turn)
                } else {
                    PickResult::Success
                };
                BoardStatus::MoveFinished { result, promoted }
            }
            Some(InFlight::Replay) | None => BoardStatus::MoveFinished {
                result: PickResult::Success,
                promoted,
            },
            Some(InFlight::Undo { mv, turn }) => {
                self.sets.revert(&mv, turn);
                BoardStatus::UndoFinished { turn }
            }
        }
    }

    /// How `id` should be highlighted for the selected piece.
    #[must_use]
    pub fn highlight(&self, id: CellId) -> Highlight {
        if self.is_busy() {
            return Highlight::None;
        }
        let Some(origin) = self.selected else {
            return Highlight::None;
        };
        match self.valid_moves.find(origin, id) {
            Some(mv) if mv.is_capture() => Highlight::Capture,
            Some(_) => Highlight::Move,
            None => Highlight::None,
        }
    }

    /// Full transform of the piece on `id`, in cell units relative to the cell.
    #[must_use]
    pub fn piece_transform(&self, id: CellId) -> Mat4 {
        let motion = self.cell(id).piece_motion();
        match self.invalid_picks.get(&id) {
            Some(bounce) => bounce.apply() * motion,
            None => motion,
        }
    }
}

#[expect(clippy::cast_precision_loss)]
fn highlight_phase(now: Timestamp) -> f32 {
    (now.as_millis() as f32 / HIGHLIGHT_PERIOD_MS) % HIGHLIGHT_WRAP
}
