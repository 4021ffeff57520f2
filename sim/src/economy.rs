//! The shop: trade collected coins for throwable items.

use thiserror::Error;

use crate::actor::Player;
use crate::collision::Vec3;
use crate::config::SimConfig;

/// Where the shop chest stands in the demo arena.
pub const DEFAULT_SHOP_POSITION: [f32; 3] = [8.0, 1.25, 7.0];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShopError {
    #[error("too far from the shop")]
    OutOfRange,

    #[error("not enough coins: need {needed}, have {have}")]
    NotEnoughCoins { needed: u32, have: u32 },

    #[error("the shop is sold out")]
    OutOfStock,
}

#[derive(Clone, Debug)]
pub struct Shop {
    pub position: Vec3,
    pub reach: f32,
    pub coin_price: u32,
    pub stock: u32,
}

impl Shop {
    pub fn new(position: Vec3, cfg: &SimConfig) -> Self {
        Self {
            position,
            reach: cfg.shop_reach,
            coin_price: cfg.shop_coin_price,
            stock: cfg.shop_stock,
        }
    }

    /// Whether the player's eye is close enough to trade.
    pub fn in_range(&self, player: &Player) -> bool {
        (player.eye() - self.position).norm_squared() < self.reach * self.reach
    }

    /// Spend `coin_price` coins for one item.
    pub fn buy_item(&mut self, player: &mut Player) -> Result<(), ShopError> {
        if !self.in_range(player) {
            return Err(ShopError::OutOfRange);
        }
        if self.stock == 0 {
            return Err(ShopError::OutOfStock);
        }
        let have = player.state.ammo.coins;
        if have < self.coin_price {
            return Err(ShopError::NotEnoughCoins {
                needed: self.coin_price,
                have,
            });
        }

        player.state.ammo.coins -= self.coin_price;
        player.state.ammo.items = player.state.ammo.items.saturating_add(1);
        self.stock -= 1;
        log::debug!(
            "bought item: {} coins left, {} in stock",
            player.state.ammo.coins,
            self.stock
        );
        Ok(())
    }
}
