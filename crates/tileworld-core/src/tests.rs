#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::enums::*;
    use crate::error::WorldError;
    use crate::events::{Actor, GameEvent};
    use crate::profiles::get_profile;
    use crate::state::{GameStateSnapshot, TileRange};
    use crate::types::{Position, SimTime, Size, TileCoord, UnitId};

    #[test]
    fn test_tile_type_serde() {
        for v in TileType::ALL {
            let json = serde_json::to_string(&v).unwrap();
            let back: TileType = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_tile_type_codes() {
        for v in TileType::ALL {
            assert_eq!(TileType::from_code(v.code()), Some(v));
        }
        assert_eq!(TileType::from_code(3), None);
        assert_eq!(TileType::default(), TileType::Grass);
    }

    #[test]
    fn test_unit_type_names() {
        let names: Vec<&str> = UnitType::ALL.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["Warrior", "Archer", "Mage", "Scout"]);
        assert!(!UnitType::RANDOM_SPAWN.contains(&UnitType::Scout));
    }

    #[test]
    fn test_profiles() {
        let warrior = get_profile(UnitType::Warrior);
        assert_eq!(warrior.stats.health, 100);
        assert_eq!(warrior.stats.defense, 15);
        assert_eq!(warrior.appearance.size, 24);

        let scout = get_profile(UnitType::Scout);
        assert_eq!(scout.stats.speed, 6);
        assert_eq!(scout.appearance.color, "#DAA520");

        // Mage hits hardest, scout is fastest.
        let max_damage = UnitType::ALL
            .iter()
            .max_by_key(|t| get_profile(**t).stats.damage)
            .copied();
        assert_eq!(max_damage, Some(UnitType::Mage));
    }

    #[test]
    fn test_player_command_serde() {
        let cmd = PlayerCommand::CreateUnit {
            unit_type: UnitType::Archer,
            x: 10,
            y: 12,
            name: None,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"CreateUnit\""), "Tagged: {json}");

        let parsed: PlayerCommand =
            serde_json::from_str(r#"{"type":"CreateUnit","unit_type":"Mage","x":1,"y":2}"#)
                .unwrap();
        match parsed {
            PlayerCommand::CreateUnit {
                unit_type, name, ..
            } => {
                assert_eq!(unit_type, UnitType::Mage);
                assert!(name.is_none(), "Name defaults to None");
            }
            other => panic!("Unexpected command: {other:?}"),
        }

        let mv: PlayerCommand =
            serde_json::from_str(r#"{"type":"MoveUnit","unit_id":3,"x":5,"y":6}"#).unwrap();
        assert!(matches!(
            mv,
            PlayerCommand::MoveUnit {
                unit_id: UnitId(3),
                x: 5,
                y: 6
            }
        ));
    }

    #[test]
    fn test_game_event_serde() {
        let event = GameEvent::PathPlanned {
            actor: Actor::Unit {
                unit_id: UnitId(2),
            },
            steps: 7,
            destination: TileCoord::new(4, 5),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
        assert!(json.contains("\"kind\":\"Unit\""));
    }

    #[test]
    fn test_snapshot_default_serializes() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, GamePhase::Active);
        assert!(back.units.is_empty());
    }

    #[test]
    fn test_unit_id_display() {
        assert_eq!(UnitId(7).to_string(), "unit_7");
        assert_eq!(
            WorldError::UnitNotFound(UnitId(7)).to_string(),
            "unit not found: unit_7"
        );
        assert_eq!(
            WorldError::Occupied(TileCoord::new(3, 4)).to_string(),
            "tile already occupied at (3, 4)"
        );
    }

    #[test]
    fn test_position_math() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);

        let size = Size::square(20.0);
        let center = a.center_of(size);
        assert_eq!(center, Position::new(10.0, 10.0));
        assert_eq!(center.top_left_for(size), a);
    }

    #[test]
    fn test_tile_coord_adjacency() {
        let c = TileCoord::new(5, 5);
        assert!(c.is_adjacent(&TileCoord::new(6, 6)));
        assert!(c.is_adjacent(&TileCoord::new(5, 4)));
        assert!(!c.is_adjacent(&c));
        assert!(!c.is_adjacent(&TileCoord::new(7, 5)));
    }

    #[test]
    fn test_tile_range() {
        let range = TileRange {
            start_x: 2,
            start_y: 3,
            end_x: 4,
            end_y: 4,
        };
        assert_eq!(range.len(), 6);
        assert_eq!(range.iter().count(), 6);
        assert_eq!(range.iter().next(), Some(TileCoord::new(2, 3)));
        assert!(range.contains(TileCoord::new(4, 4)));
        assert!(!range.contains(TileCoord::new(5, 4)));

        let empty = TileRange {
            start_x: 5,
            start_y: 0,
            end_x: 4,
            end_y: 0,
        };
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance();
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }
}
