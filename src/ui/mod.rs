/// Widgets for the two screens
///
/// - card.rs: the swipeable card stack (canvas)
/// - saved.rs: the saved restaurants list

pub mod card;
pub mod saved;
