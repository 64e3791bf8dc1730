use alloy::sol;

// Betting returns the bet as 14 positional values, not an ABI struct.
sol! {
    #[sol(rpc)]
    interface IBetting {
        function createBet(
            string title,
            string description,
            string category,
            string twitterHandle,
            uint256 endDate,
            uint256 joinAmount,
            uint256 initialPoolAmount,
            string imageURL
        ) external payable;
        function joinBet(uint256 betId, bool support) external payable;
        function closeBet(uint256 betId, bool outcome) external;
        function withdraw() external;
        function betCounter() external view returns (uint256);
        function getBetDetailsAsStruct(uint256 betId)
            external
            view
            returns (
                uint256 id,
                address creator,
                uint256 amount,
                string title,
                string description,
                string category,
                string twitterHandle,
                uint256 endDate,
                uint256 initialPoolAmount,
                string imageURL,
                bool isClosed,
                uint256 supportCount,
                uint256 againstCount,
                bool outcome
            );
    }
}

sol! {
    #[sol(rpc)]
    interface IFactory {
        struct TokenSale {
            address token;
            string name;
            address creator;
            uint256 sold;
            uint256 raised;
            bool isOpen;
            string metadataURI;
        }

        function fee() external view returns (uint256);
        function create(string name, string symbol, string metadataURI) external payable;
        function getCost(uint256 sold) external view returns (uint256);
        function buy(address token, uint256 amount) external payable;
        function totalTokens() external view returns (uint256);
        function getTokenSale(uint256 index) external view returns (TokenSale memory);
        function getPriceForTokens(address token, uint256 amount) external view returns (uint256);
        function getEstimatedTokensForEth(address token, uint256 ethAmount) external view returns (uint256);
        function getEstimatedEthForTokens(address token, uint256 tokenAmount) external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    interface INativeLiquidityPool {
        function swapEthForToken(address token) external payable;
        function swapTokenForEth(address token, uint256 tokenAmount) external;
    }
}

sol! {
    interface IERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);
    }
}
