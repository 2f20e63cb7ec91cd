//! Whole-session tests against the in-memory screen.

use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

use snake::food::Food;
use snake::game::{Outcome, SnakeGame, FOOD_SCORE};
use snake::snake::{Collision, Direction, Snake};
use snake::term::{BufferScreen, Key};

fn new_game(seed: u64) -> SnakeGame<BufferScreen, StdRng> {
    SnakeGame::new(40, 20, BufferScreen::new(40, 20), StdRng::seed_from_u64(seed))
        .with_tick_interval(Duration::ZERO)
}

#[test]
fn test_head_advances_by_direction_every_tick() {
    let mut game = new_game(1);
    game.place_food((1, 1));
    let turns = [Key::Up, Key::Left, Key::Down, Key::Left, Key::Up];

    for key in turns {
        game.screen_mut().push_key(key);
        game.handle_input().unwrap();

        for _ in 0..2 {
            let before = game.snake().head();
            let len = game.snake().len();
            let (dx, dy) = game.snake().direction().delta();

            game.update();

            assert_eq!(game.snake().head(), (before.0 + dx, before.1 + dy));
            assert_eq!(game.snake().len(), len);
            assert!(!game.is_over());
        }
    }
}

#[test]
fn test_length_grows_by_one_per_food() {
    let mut game = new_game(2);

    for eaten in 1..=4u32 {
        let (x, y) = game.snake().head();
        game.place_food((x + 1, y));
        let len = game.snake().len();

        game.update();
        assert_eq!(game.score(), eaten * FOOD_SCORE);
        assert_eq!(game.snake().len(), len);

        game.place_food((1, 1));
        game.update();
        assert_eq!(game.snake().len(), len + 1);
    }
}

#[test]
fn test_reverse_key_is_ignored_by_the_loop() {
    let mut game = new_game(3);
    game.place_food((1, 1));
    game.screen_mut().push_key(Key::Char('a'));
    game.handle_input().unwrap();
    game.update();

    assert_eq!(game.snake().direction(), Direction::Right);
    assert_eq!(game.snake().head(), (21, 10));
    assert!(!game.is_over());
}

#[test]
fn test_self_collision_ends_the_session() {
    let mut game = new_game(4);
    game.place_food((1, 1));
    *game.snake_mut() = Snake::from_segments(
        &[(10, 5), (10, 6), (11, 6), (12, 6), (12, 5), (11, 5), (11, 4)],
        Direction::Right,
    )
    .unwrap();

    game.update();
    assert_eq!(game.snake().head(), (11, 5));
    assert_eq!(game.outcome(), Some(Outcome::Crashed(Collision::Body)));
}

#[test]
fn test_run_until_quit_shows_game_over() {
    let mut game = new_game(5);
    game.place_food((1, 1));
    game.screen_mut().push_key(Key::Char('q'));
    game.screen_mut().push_key(Key::Char(' '));

    game.run().unwrap();

    assert_eq!(game.outcome(), Some(Outcome::Quit));
    assert_eq!(game.screen().pending_keys(), 0);

    let screen = game.screen();
    assert_eq!(screen.row(10).find("GAME OVER!"), Some(15));
    assert_eq!(screen.row(11).find("Final Score: 0"), Some(10));
    assert_eq!(screen.row(13).find("Press any key to exit..."), Some(8));
    assert_eq!(screen.count_char('#'), 0);
}

#[test]
fn test_quit_on_the_eating_tick_keeps_the_points() {
    let mut game = new_game(9);
    game.place_food((21, 10));
    game.screen_mut().push_key(Key::Char('q'));
    game.screen_mut().push_key(Key::Char(' '));

    game.run().unwrap();

    assert_eq!(game.outcome(), Some(Outcome::Quit));
    assert_eq!(game.snake().head(), (21, 10));
    assert_eq!(game.score(), FOOD_SCORE);
    assert_eq!(game.screen().row(11).find("Final Score: 10"), Some(10));
}

#[test]
fn test_wall_crash_reports_final_score() {
    let mut game = new_game(6);
    game.place_food((21, 10));
    game.update();
    game.place_food((1, 1));

    while !game.is_over() {
        game.update();
        game.draw().unwrap();
    }

    assert_eq!(game.outcome(), Some(Outcome::Crashed(Collision::Wall)));
    assert_eq!(game.snake().head(), (39, 10));

    game.screen_mut().push_key(Key::Char('x'));
    game.show_game_over().unwrap();
    assert!(game.screen().contains_text(&format!("Final Score: {}", FOOD_SCORE)));
}

#[test]
fn test_paused_run_still_quits() {
    let mut game = new_game(7);
    game.place_food((1, 1));
    for key in [Key::Esc, Key::Other, Key::Other, Key::Interrupt, Key::Other] {
        game.screen_mut().push_key(key);
    }

    game.run().unwrap();

    assert_eq!(game.outcome(), Some(Outcome::Quit));
    assert_eq!(game.snake().head(), (20, 10));
}

#[test]
fn test_food_spawns_inside_small_boards() {
    let mut rng = StdRng::seed_from_u64(8);
    for (w, h) in [(3, 3), (5, 4), (40, 20)] {
        let mut food = Food::new(w, h, &mut rng);
        for _ in 0..200 {
            food.spawn(&mut rng);
            let (x, y) = food.position();
            assert!(x >= 1 && x <= w - 2);
            assert!(y >= 1 && y <= h - 2);
        }
    }
}
